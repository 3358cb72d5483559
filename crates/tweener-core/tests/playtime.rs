use tweener_core::{Anim, AnimCtx, Anims, Target, PLAYTIME_INFINITE, REPEAT_INFINITE};

fn noop(_ctx: &mut AnimCtx<'_, ()>, _target: Target, _v: i32) {}

fn anim() -> Anim<()> {
    Anim::new()
        .with_target(Target::Handle(1))
        .with_exec(noop)
        .with_values(0, 100)
        .with_early_apply(false)
}

#[test]
fn one_shot_playtime_is_the_remaining_leg() {
    let mut anims = Anims::new();
    let id = anims.start(&mut (), anim().with_duration(1000), 0);

    assert_eq!(anims.playtime(id), Some(1000));

    anims.tick(&mut (), 400);
    assert_eq!(anims.playtime(id), Some(600));
}

#[test]
fn playtime_counts_playback_and_repeats() {
    let mut anims = Anims::new();
    let id = anims.start(
        &mut (),
        anim()
            .with_duration(1000)
            .with_repeat_count(2)
            .with_repeat_delay(100)
            .with_playback_duration(500)
            .with_playback_delay(50),
        0,
    );

    // Leg remainder 1000, one playback (50 + 500), one full extra
    // round trip (100 + 1000 + 50 + 500).
    assert_eq!(anims.playtime(id), Some(3200));
}

#[test]
fn playtime_in_playback_excludes_the_extra_leg() {
    let mut anims = Anims::new();
    let id = anims.start(
        &mut (),
        anim().with_duration(500).with_playback_duration(500),
        0,
    );

    anims.tick(&mut (), 500); // forward leg complete, now in playback
    let snap = anims.get(id).expect("live");
    assert!(snap.in_playback());
    assert_eq!(anims.playtime(id), Some(500));
}

#[test]
fn infinite_repeat_reports_the_sentinel() {
    let mut anims = Anims::new();
    let id = anims.start(
        &mut (),
        anim().with_duration(1000).with_repeat_count(REPEAT_INFINITE),
        0,
    );

    assert_eq!(anims.playtime(id), Some(PLAYTIME_INFINITE));
}

#[test]
fn playtime_of_a_retired_record_is_none() {
    let mut anims = Anims::new();
    let id = anims.start(&mut (), anim().with_duration(100), 0);

    anims.tick(&mut (), 100);
    assert_eq!(anims.playtime(id), None);
}
