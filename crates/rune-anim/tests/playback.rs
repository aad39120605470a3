use anyhow::Result;
use rune_anim::canned::{fade_in, move_by, move_to};
use rune_anim::{
    AnimValue, AnimationConfig, AnimationTarget, Animator, Easing, FrameHost, ManualFrameHost,
    ParallelPlayable, Path, Playable, Point, PropertyAccessor, Scheduler, SequentialPlayable,
    SharedTarget, ValueKind,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Default)]
struct Node {
    alpha: f64,
    position: Point,
    scale: Point,
    outline: Vec<Point>,
    path: Path,
}

impl AnimationTarget for Node {
    fn alpha(&self) -> f64 {
        self.alpha
    }
    fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }
    fn position(&self) -> Point {
        self.position
    }
    fn set_position(&mut self, position: Point) {
        self.position = position;
    }
    fn scale(&self) -> Point {
        self.scale
    }
    fn set_scale(&mut self, scale: Point) {
        self.scale = scale;
    }
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn completion_counter(playable: &dyn Playable) -> Rc<Cell<u32>> {
    let count = Rc::new(Cell::new(0));
    let c = count.clone();
    playable.on_complete(Box::new(move || c.set(c.get() + 1)));
    count
}

fn outline_accessor(node: &Rc<RefCell<Node>>) -> PropertyAccessor {
    PropertyAccessor::for_target(
        node,
        "outline",
        |n| AnimValue::Polyline(n.outline.clone()),
        |n, v| {
            if let Some(points) = v.as_polyline() {
                n.outline = points.to_vec();
            }
        },
    )
}

fn path_accessor(node: &Rc<RefCell<Node>>) -> PropertyAccessor {
    PropertyAccessor::for_target(
        node,
        "path",
        |n| AnimValue::Path(n.path.clone()),
        |n, v| {
            if let Some(path) = v.as_path() {
                n.path = path.clone();
            }
        },
    )
}

fn setup() -> (Rc<ManualFrameHost>, Scheduler, Rc<RefCell<Node>>) {
    let host = Rc::new(ManualFrameHost::new());
    let scheduler = Scheduler::new(host.clone());
    (host, scheduler, Rc::new(RefCell::new(Node::default())))
}

#[test]
fn scheduler_requests_no_frames_once_idle() {
    let (host, scheduler, node) = setup();
    let target: SharedTarget = node.clone();

    let fade = fade_in(&target, &scheduler);
    fade.play_now();
    assert!(scheduler.is_subscribed());

    for _ in 0..40 {
        host.advance_frame();
    }
    assert!(!fade.is_running());
    assert!(!scheduler.is_subscribed());
    assert_eq!(scheduler.active_count(), 0);

    let requests = host.request_count();
    for _ in 0..10 {
        host.advance_frame();
    }
    assert_eq!(host.request_count(), requests);
    assert_eq!(host.pending_count(), 0);
}

#[test]
fn parallel_completes_once_whatever_order_children_finish() {
    for durations in [[0.1, 0.3, 0.2], [0.3, 0.2, 0.1], [0.3, 0.3, 0.3]] {
        let (host, scheduler, _node) = setup();
        let values: Vec<Rc<RefCell<f64>>> =
            (0..3).map(|_| Rc::new(RefCell::new(0.0))).collect();

        let children: Vec<Rc<dyn Playable>> = values
            .iter()
            .zip(durations)
            .map(|(value, duration)| {
                let animator = Animator::with_timing(&scheduler, duration, 0.0, Easing::Linear);
                animator.add_property(
                    PropertyAccessor::for_target(
                        value,
                        "value",
                        |v| AnimValue::Number(*v),
                        |v, next| {
                            if let Some(n) = next.as_number() {
                                *v = n;
                            }
                        },
                    ),
                    ValueKind::Number,
                    1.0,
                );
                Rc::new(animator) as Rc<dyn Playable>
            })
            .collect();

        let parallel = ParallelPlayable::new(&scheduler, children);
        let done = completion_counter(&parallel);
        parallel.play_now();

        host.advance(100.0);
        host.advance(100.0);
        assert_eq!(done.get(), 0, "{durations:?}");
        host.advance(100.0);
        host.advance(100.0);

        assert_eq!(done.get(), 1, "{durations:?}");
        for value in &values {
            assert_eq!(*value.borrow(), 1.0);
        }
    }
}

#[test]
fn sequence_starts_each_child_after_the_previous() {
    let (host, scheduler, node) = setup();
    let target: SharedTarget = node.clone();

    let first = move_to(&target, &scheduler, Point::new(10.0, 0.0));
    let second = move_by(&target, &scheduler, 5.0, 5.0);
    first.animator().set_duration(0.5);
    second.animator().set_duration(0.5);

    let started_second_at = Rc::new(Cell::new(None));
    let (s, h) = (started_second_at.clone(), host.clone());
    first.on_complete(Box::new(move || s.set(Some(h.now_ms()))));

    let sequence = SequentialPlayable::new(&scheduler, vec![
        Rc::new(first) as Rc<dyn Playable>,
        Rc::new(second) as Rc<dyn Playable>,
    ]);
    let done = completion_counter(&sequence);
    sequence.play_now();

    host.advance(500.0);
    assert_eq!(node.borrow().position, Point::new(10.0, 0.0));
    assert_eq!(started_second_at.get(), Some(500.0));

    host.advance(250.0);
    assert_eq!(node.borrow().position, Point::new(12.5, 2.5));

    host.advance(250.0);
    assert_eq!(node.borrow().position, Point::new(15.0, 5.0));
    assert_eq!(done.get(), 1);
}

#[test]
fn stop_without_jump_leaves_grow_at_forty_percent() -> Result<()> {
    let (host, scheduler, node) = setup();
    let animator = Animator::with_timing(&scheduler, 1.0, 0.0, Easing::Linear);
    animator.add_property(
        outline_accessor(&node),
        ValueKind::GrowPolyline,
        vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
    );
    animator.add_property(
        path_accessor(&node),
        ValueKind::GrowPath,
        "M0 0 L50 0 L50 50".parse::<Path>()?,
    );

    animator.play_now();
    host.advance(400.0);
    animator.stop(false);
    host.advance(400.0);

    let n = node.borrow();
    assert_eq!(n.outline.len(), 2);
    assert!(approx_eq(n.outline[1].x, 40.0));
    assert_eq!(n.path.to_string(), "M0,0 L40,0");
    Ok(())
}

#[test]
fn nested_combinators() {
    let (host, scheduler, node) = setup();
    let target: SharedTarget = node.clone();

    let fade = fade_in(&target, &scheduler);
    let slide = move_by(&target, &scheduler, 100.0, 0.0);
    let together: Rc<dyn Playable> = Rc::new(ParallelPlayable::new(
        &scheduler,
        vec![Rc::new(fade) as Rc<dyn Playable>, Rc::new(slide) as Rc<dyn Playable>],
    ));
    let back = move_by(&target, &scheduler, -100.0, 0.0);

    let sequence = SequentialPlayable::new(&scheduler, vec![together, Rc::new(back) as Rc<dyn Playable>]);
    let done = completion_counter(&sequence);
    assert!(approx_eq(sequence.duration(), 1.0));

    sequence.play_now();
    host.advance(500.0);
    assert!(approx_eq(node.borrow().alpha, 1.0));
    assert!(approx_eq(node.borrow().position.x, 100.0));

    host.advance(500.0);
    assert!(approx_eq(node.borrow().position.x, 0.0));
    assert_eq!(done.get(), 1);
}

#[test]
fn config_controls_offscreen_and_defaults() -> Result<()> {
    let config: AnimationConfig = toml::from_str(
        r#"
        [scheduler]
        jump_when_offscreen = false

        [defaults]
        duration = 2.0
        easing = "quadratic-in"
        "#,
    )?;

    let host = Rc::new(ManualFrameHost::from_config(&config.scheduler));
    host.set_offscreen(true);
    let scheduler = Scheduler::with_config(host.clone(), &config);
    let node = Rc::new(RefCell::new(Node::default()));
    let target: SharedTarget = node.clone();

    let fade = fade_in(&target, &scheduler);
    assert!(approx_eq(fade.duration(), 2.0));
    fade.play_now();

    host.advance(1000.0);
    // Offscreen jumping is disabled, so the curve is honoured.
    assert!(approx_eq(node.borrow().alpha, 0.25));
    assert!(fade.is_running());

    host.advance(1000.0);
    assert!(approx_eq(node.borrow().alpha, 1.0));
    Ok(())
}
