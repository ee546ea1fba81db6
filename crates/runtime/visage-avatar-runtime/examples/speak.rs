//! Lip-sync playback end to end: load the demo avatar, spawn the
//! animator, drive the audio clock from wall time the way a media
//! callback would, and blend geometry from the published snapshots.
//!
//! Run with `RUST_LOG=debug cargo run --example speak` for the animator
//! logs.

use std::thread;
use std::time::{Duration, Instant};

use visage_avatar_core::{
    avatar::Avatar, blender::BlendScratch, config::Config, definition::AvatarDefinition,
    mesh::ShapeGeometry,
};
use visage_avatar_runtime::{AnimationScheduler, AvatarCommand};
use visage_test_fixtures::{avatars, geometries, tracks};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let definition: AvatarDefinition = avatars::load("demo")?;
    let face: ShapeGeometry = geometries::load("demo_face")?;
    let mouth: ShapeGeometry = geometries::load("demo_mouth")?;

    // The render side keeps its own handles on the immutable geometry;
    // the avatar itself moves onto the animator thread.
    let avatar = Avatar::from_definition(&definition, face, vec![mouth], Config::default())?;
    let face_geometry = avatar.face().geometry().clone();
    let mut scratch = BlendScratch::for_geometry(&face_geometry);

    let mut scheduler = AnimationScheduler::spawn(avatar)?;
    let clock = scheduler.clock();

    // A speech pipeline would stream viseme keys; the fixture track
    // stands in for one here.
    let track: visage_avatar_core::definition::AnimationDef = tracks::load("hello")?;
    let keys = track
        .keys
        .iter()
        .map(|k| {
            visage_avatar_core::track::KeyFrame::with_aux(
                k.t,
                visage_avatar_core::pose::FacePose::new(k.face.clone()),
                k.aux,
            )
        })
        .collect();
    scheduler.send(AvatarCommand::AddAnimation {
        name: track.name.clone(),
        keys,
    });
    scheduler.send(AvatarCommand::SetAnimation(track.name.clone()));
    scheduler.send(AvatarCommand::EnableBlinking(true));
    scheduler.send(AvatarCommand::StartAnimation);

    // Pretend playback: wall time is the audio position.
    let started = Instant::now();
    let mut last_seq = 0;
    while started.elapsed() < Duration::from_millis(700) {
        clock.set(started.elapsed().as_millis() as u32);

        let snapshot = scheduler.latest();
        if snapshot.seq != last_seq {
            last_seq = snapshot.seq;
            visage_avatar_core::blender::evaluate(
                &face_geometry,
                &snapshot.face_weights,
                &mut scratch,
            )?;
            println!(
                "tick {:>3} @ {:>3} ms  mouth={:.2}  nod={:+.2}  vertex0=({:.3}, {:.3}, {:.3})",
                snapshot.seq,
                started.elapsed().as_millis(),
                snapshot.face_weights[3],
                snapshot.aux,
                scratch.vertices[0],
                scratch.vertices[1],
                scratch.vertices[2],
            );
        }
        thread::sleep(Duration::from_millis(16));
    }

    scheduler.send(AvatarCommand::SetNeutralFace);
    thread::sleep(Duration::from_millis(600));
    println!(
        "final face weights: {:?}",
        scheduler.latest().face_weights
    );
    scheduler.stop();
    Ok(())
}
