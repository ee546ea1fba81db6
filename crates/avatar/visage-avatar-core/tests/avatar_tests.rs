use visage_avatar_core::{
    avatar::Avatar,
    config::Config,
    mesh::{BlendShapeMesh, ShapeDelta, ShapeGeometry},
    pose::FacePose,
    track::KeyFrame,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn mk_geometry(name: &str, shapes: usize) -> ShapeGeometry {
    ShapeGeometry {
        name: name.to_string(),
        neutral_vertices: vec![0.0; 6],
        neutral_normals: vec![0.0; 6],
        deltas: (0..shapes)
            .map(|i| {
                let mut vertices = vec![0.0; 6];
                vertices[0] = (i + 1) as f32;
                ShapeDelta {
                    name: format!("{name}_{i}"),
                    vertices,
                    normals: vec![0.0; 6],
                }
            })
            .collect(),
    }
}

/// 8 face shapes, one mouth mesh with 4, couplings 3->1 4->2 5->3, blink
/// slots 1 and 2, joy/sad emotions, aa/oh visemes.
fn mk_avatar() -> Avatar {
    let face = BlendShapeMesh::new(mk_geometry("face", 8)).unwrap();
    let teeth = BlendShapeMesh::new(mk_geometry("teeth", 4)).unwrap();
    let mut avatar = Avatar::new(face, vec![teeth], Config::default()).unwrap();

    avatar.set_blink_slots(1, 2);
    assert!(avatar.add_coupling(3, 1));
    assert!(avatar.add_coupling(4, 2));
    assert!(avatar.add_coupling(5, 3));
    avatar.set_mouth_region(vec![3, 4, 5]);

    avatar.add_emotion(
        "joy",
        FacePose::with_mouth(
            vec![0.0, 0.0, 0.0, 0.1, 0.8, 0.0, 0.2, 0.0],
            vec![0.0, 0.1, 0.8, 0.0],
        ),
    );
    avatar.add_emotion(
        "sad",
        FacePose::new(vec![0.0, 0.2, 0.2, 0.0, 0.0, 0.0, 0.0, 0.7]),
    );
    avatar.add_viseme(
        "aa",
        FacePose::with_mouth(
            vec![0.0, 0.0, 0.0, 0.9, 0.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.9, 0.0, 0.0],
        ),
    );
    avatar.add_viseme(
        "oh",
        FacePose::with_mouth(
            vec![0.0, 0.0, 0.0, 0.5, 0.0, 0.8, 0.0, 0.0],
            vec![0.0, 0.5, 0.0, 0.8],
        ),
    );
    avatar
}

/// it should reject mouth meshes that disagree on shape count
#[test]
fn mouth_meshes_must_share_a_shape_space() {
    let face = BlendShapeMesh::new(mk_geometry("face", 8)).unwrap();
    let teeth = BlendShapeMesh::new(mk_geometry("teeth", 4)).unwrap();
    let tongue = BlendShapeMesh::new(mk_geometry("tongue", 3)).unwrap();
    assert!(Avatar::new(face, vec![teeth, tongue], Config::default()).is_err());
}

/// it should apply an emotion to the face and the mouth space
#[test]
fn set_emotion_writes_both_spaces() {
    let mut avatar = mk_avatar();
    avatar.set_emotion("joy");
    approx(avatar.face_weights()[4], 0.8, 1e-6);
    approx(avatar.face_weights()[6], 0.2, 1e-6);
    approx(avatar.mouth_weights()[2], 0.8, 1e-6);
}

/// it should leave everything alone on an unknown emotion name
#[test]
fn unknown_emotion_is_a_no_op() {
    let mut avatar = mk_avatar();
    avatar.set_emotion("joy");
    let before = avatar.face_weights().to_vec();
    avatar.set_emotion("rage");
    assert_eq!(avatar.face_weights(), before.as_slice());
}

/// it should only let a viseme claim slots above the threshold
#[test]
fn viseme_claims_only_loud_slots() {
    let mut avatar = mk_avatar();
    avatar.set_emotion("joy");
    avatar.set_viseme("aa", 0.25);

    // Slot 3: claimed (0.9 > threshold): 0.25 * (0.1 - 0.9) + 0.9 = 0.7
    approx(avatar.face_weights()[3], 0.7, 1e-6);
    // Slot 4: aa holds 0.0 there, emotion survives untouched.
    approx(avatar.face_weights()[4], 0.8, 1e-6);
    // Mouth space: slot 1 claimed: 0.25 * (0.1 - 0.9) + 0.9 = 0.7
    approx(avatar.mouth_weights()[1], 0.7, 1e-6);
}

/// it should snap claimed slots fully to the viseme at weight zero
#[test]
fn viseme_at_zero_emotion_weight_is_pure() {
    let mut avatar = mk_avatar();
    avatar.set_emotion("joy");
    avatar.set_viseme("aa", 0.0);
    approx(avatar.face_weights()[3], 0.9, 1e-6);
}

/// it should mix the mouth region between emotion and viseme by weight
#[test]
fn blend_viseme_emotion_balances_the_mouth_region() {
    let mut avatar = mk_avatar();
    avatar.blend_viseme_emotion("oh", "joy", 0.25);

    // Region slots: w * emo + (1 - w) * vis.
    approx(avatar.face_weights()[3], 0.25 * 0.1 + 0.75 * 0.5, 1e-6);
    approx(avatar.face_weights()[4], 0.25 * 0.8 + 0.75 * 0.0, 1e-6);
    approx(avatar.face_weights()[5], 0.25 * 0.0 + 0.75 * 0.8, 1e-6);
    // Outside the region the emotion stands.
    approx(avatar.face_weights()[6], 0.2, 1e-6);
    // Coupling ran afterwards: mouth slot 1 mirrors face slot 3.
    approx(avatar.mouth_weights()[1], avatar.face_weights()[3], 1e-6);
}

/// it should still propagate coupling when a blend name misses
#[test]
fn blend_with_unknown_name_still_couples() {
    let mut avatar = mk_avatar();
    avatar.set_face_weight(3, 0.6);
    avatar.blend_viseme_emotion("nope", "joy", 0.5);
    approx(avatar.mouth_weights()[1], 0.6, 1e-6);
}

/// it should guard single-slot writes: slot zero and out-of-range refused
#[test]
fn single_slot_writes_are_guarded() {
    let mut avatar = mk_avatar();
    avatar.set_face_weight(0, 0.9);
    avatar.set_face_weight(99, 0.9);
    avatar.set_mouth_weight(0, 0.9);
    avatar.set_mouth_weight(99, 0.9);
    assert_eq!(avatar.face_weights()[0], 0.0);
    assert!(avatar.face_weights().iter().all(|&w| w == 0.0));
    assert!(avatar.mouth_weights().iter().all(|&w| w == 0.0));

    avatar.set_face_weight(4, 0.5);
    approx(avatar.face_weights()[4], 0.5, 1e-6);
}

/// it should refuse whole-vector writes of the wrong length
#[test]
fn whole_vector_writes_are_length_guarded() {
    let mut avatar = mk_avatar();
    avatar.set_face_weights(&[1.0; 5]);
    assert!(avatar.face_weights().iter().all(|&w| w == 0.0));

    avatar.set_face_weights(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8]);
    approx(avatar.face_weights()[7], 0.8, 1e-6);
}

/// it should propagate coupled slots into every mouth mesh on tick
#[test]
fn tick_applies_coupling() {
    let mut avatar = mk_avatar();
    avatar.set_face_weight(3, 0.6);
    avatar.set_face_weight(5, 0.4);
    avatar.tick(16.0);
    approx(avatar.mouth_weights()[1], 0.6, 1e-6);
    approx(avatar.mouth_weights()[3], 0.4, 1e-6);
    // Uncoupled mouth slot 2 is untouched.
    approx(avatar.mouth_weights()[2], 0.0, 1e-6);
}

/// it should refuse out-of-range couplings and keep valid ones
#[test]
fn coupling_additions_are_validated() {
    let mut avatar = mk_avatar();
    assert!(!avatar.add_coupling(99, 1));
    assert!(!avatar.add_coupling(3, 99));
    assert!(avatar.add_coupling(6, 2));
}

/// it should list names in insertion order
#[test]
fn name_lists_keep_insertion_order() {
    let avatar = mk_avatar();
    assert_eq!(avatar.emotion_names(), vec!["joy", "sad"]);
    assert_eq!(avatar.viseme_names(), vec!["aa", "oh"]);
}

/// it should store and start a named animation
#[test]
fn stored_animations_play_by_name() {
    let mut avatar = mk_avatar();
    let keys = vec![
        KeyFrame::new(0, FacePose::new(vec![0.0; 8])),
        KeyFrame::new(100, FacePose::new(vec![0.0, 0.0, 0.0, 0.8, 0.0, 0.0, 0.0, 0.0])),
    ];
    avatar.add_animation("hello", keys);
    assert_eq!(avatar.animation_names(), vec!["hello"]);

    avatar.set_animation("hello");
    assert!(avatar.start_animation());
    avatar.set_audio_time(50);
    avatar.tick(16.0);
    approx(avatar.face_weights()[3], 0.4, 1e-6);
}

/// it should clear the loaded track when the animation name is unknown
#[test]
fn unknown_animation_clears_the_player() {
    let mut avatar = mk_avatar();
    avatar.add_animation(
        "hello",
        vec![
            KeyFrame::new(0, FacePose::new(vec![0.0; 8])),
            KeyFrame::new(100, FacePose::new(vec![0.1; 8])),
        ],
    );
    avatar.set_animation("hello");
    assert!(avatar.start_animation());
    avatar.stop_animation();

    avatar.set_animation("never-heard-of-it");
    assert!(!avatar.start_animation());
    assert!(avatar.player().track().is_empty());
}

/// it should let the blink envelope win a slot the track also drives
#[test]
fn blink_wins_overlapping_slots_within_a_tick() {
    let mut avatar = mk_avatar();
    let mut pose = vec![0.0; 8];
    pose[1] = 0.4;
    avatar.add_animation(
        "hold",
        vec![
            KeyFrame::new(0, FacePose::new(pose.clone())),
            KeyFrame::new(1000, FacePose::new(pose)),
        ],
    );
    avatar.set_animation("hold");
    assert!(avatar.start_animation());
    avatar.set_audio_time(500);
    avatar.enable_blinking(true);

    // Six 50 ms ticks put the blink timeline at 300 ms, halfway through
    // the closing phase. Playback writes 0.4 into slot 1 first each tick;
    // the blink then lifts it to weight + (1 - weight) * baseline.
    for _ in 0..6 {
        avatar.tick(50.0);
    }
    approx(avatar.face_weights()[1], 0.5 + 0.5 * 0.4, 1e-6);
    // The other blink slot rides the same envelope from a zero floor.
    approx(avatar.face_weights()[2], 0.5, 1e-6);
}

/// it should append emotion keyframes onto the live track
#[test]
fn emotion_keyframes_extend_the_track() {
    let mut avatar = mk_avatar();
    avatar.add_key(0, FacePose::neutral(8), 0.0);
    avatar.set_emotion_keyframe(100, "joy");
    avatar.set_emotion_keyframe(100, "no-such-emotion");

    assert_eq!(avatar.player().track().len(), 2);
    let key = avatar.player().track().get(1).unwrap();
    approx(key.pose.face[4], 0.8, 1e-6);
}
