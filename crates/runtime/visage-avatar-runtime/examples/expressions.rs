//! Idle expressions: cycle the fixture emotions with blinking, gaze
//! wander and head sway running, printing the rig state as it drifts.

use std::thread;
use std::time::Duration;

use glam::Vec3;

use visage_avatar_core::{
    avatar::Avatar, config::Config, definition::AvatarDefinition, mesh::ShapeGeometry,
};
use visage_avatar_runtime::{AnimationScheduler, AvatarCommand};
use visage_test_fixtures::{avatars, geometries};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let definition: AvatarDefinition = avatars::load("demo")?;
    let face: ShapeGeometry = geometries::load("demo_face")?;
    let mouth: ShapeGeometry = geometries::load("demo_mouth")?;
    let avatar = Avatar::from_definition(&definition, face, vec![mouth], Config::default())?;

    let mut scheduler = AnimationScheduler::spawn(avatar)?;
    scheduler.send(AvatarCommand::EnableBlinking(true));
    scheduler.send(AvatarCommand::EnableHeadMotion(true));
    scheduler.send(AvatarCommand::SetFollowEyes(true));
    scheduler.send(AvatarCommand::SetHeadRotation(Vec3::new(0.0, 15.0, 0.0)));

    for emotion in ["joy", "sad", "calm"] {
        scheduler.send(AvatarCommand::SetEmotion(emotion.to_string()));
        for _ in 0..4 {
            thread::sleep(Duration::from_millis(250));
            let snapshot = scheduler.latest();
            let head = snapshot.transforms.head.to_cols_array();
            println!(
                "{emotion:>5}  face={:?}  head fwd=({:+.3}, {:+.3}, {:+.3})",
                snapshot
                    .face_weights
                    .iter()
                    .map(|w| (w * 100.0).round() / 100.0)
                    .collect::<Vec<_>>(),
                head[8],
                head[9],
                head[10],
            );
        }
    }

    scheduler.send(AvatarCommand::SetNeutralFace);
    thread::sleep(Duration::from_millis(600));
    scheduler.stop();
    Ok(())
}
