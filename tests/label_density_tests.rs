use std::time::Duration;

use proptest::prelude::*;
use telechart::core::{Count, Rect};
use telechart::labels::{LabelDensity, LabelDensityConfig, MAX_SPACING_RATIO, MIN_SPACING_RATIO};
use telechart::transition::{OPAQUE, TRANSPARENT, Transition};

fn axis(len: i64) -> Vec<Count> {
    (0..len).map(Count).collect()
}

fn measure(text: &str) -> f64 {
    text.len() as f64 * 7.0
}

fn indices(cells: &[telechart::labels::LabelCell]) -> Vec<usize> {
    let mut indices: Vec<usize> = cells.iter().map(|cell| cell.index()).collect();
    indices.sort_unstable();
    indices
}

#[test]
fn zooming_in_fades_out_exactly_the_cells_left_behind() {
    let x = axis(100);
    let rect = Rect::from_size(600.0, 300.0);
    let mut density = LabelDensity::new(LabelDensityConfig::default());
    density
        .rebuild(&x, 0, 99, rect, Duration::ZERO, &measure)
        .expect("first rebuild");

    let pass = density
        .rebuild(&x, 80, 99, rect, Duration::from_millis(16), &measure)
        .expect("zoomed rebuild");

    assert_eq!(indices(density.cells()), vec![83, 87, 91, 95, 99]);
    assert_eq!(indices(density.fading()), vec![3, 19, 35, 51, 67]);
    assert_eq!(pass.out_of_range, 5);
    assert_eq!(pass.dropped, 0);
    assert_eq!(density.step(), 4);

    let target = density.target_spacing(80, 99);
    let spacing = density.step() as f64;
    assert!(spacing >= MIN_SPACING_RATIO * target && spacing <= MAX_SPACING_RATIO * target);
}

#[test]
fn midpoints_fade_in_while_survivors_stay_opaque() {
    let x = axis(100);
    let rect = Rect::from_size(600.0, 300.0);
    let mut density = LabelDensity::new(LabelDensityConfig::default());
    density.rebuild(&x, 0, 99, rect, Duration::ZERO, &measure).expect("rebuild");
    density.rebuild(&x, 80, 99, rect, Duration::ZERO, &measure).expect("rebuild");

    for cell in density.cells() {
        match cell.index() {
            83 | 99 => assert_eq!(cell.alpha(), OPAQUE),
            _ => assert_eq!(cell.alpha(), TRANSPARENT),
        }
    }

    density.advance(Duration::from_millis(200));
    assert!(density.cells().iter().all(|cell| cell.alpha() == OPAQUE));
    assert!(density.fading().is_empty());
}

#[test]
fn zooming_out_thins_the_axis() {
    let x = axis(1000);
    let rect = Rect::from_size(600.0, 300.0);
    let mut density = LabelDensity::new(LabelDensityConfig::default());
    density.rebuild(&x, 900, 999, rect, Duration::ZERO, &measure).expect("rebuild");
    let before = density.step();

    let pass = density
        .rebuild(&x, 0, 999, rect, Duration::from_millis(16), &measure)
        .expect("rebuild");
    assert!(density.step() > before);
    assert!(pass.dropped > 0);
    let steps: Vec<usize> = density
        .cells()
        .windows(2)
        .map(|pair| pair[1].index() - pair[0].index())
        .collect();
    assert!(steps.iter().all(|step| *step == density.step()));
}

#[test]
fn rebuild_rejects_windows_outside_the_axis() {
    let x = axis(10);
    let mut density = LabelDensity::new(LabelDensityConfig::default());
    assert!(
        density
            .rebuild(&x, 0, 10, Rect::from_size(100.0, 50.0), Duration::ZERO, &measure)
            .is_err()
    );
}

proptest! {
    #[test]
    fn step_stays_inside_the_spacing_band(
        windows in prop::collection::vec((0usize..1_988, 12usize..1_000), 1..12)
    ) {
        let x = axis(2_000);
        let rect = Rect::from_size(800.0, 300.0);
        let mut density = LabelDensity::new(LabelDensityConfig::default());
        let mut now = Duration::ZERO;
        for (min, span) in windows {
            let max = (min + span).min(1_999);
            now += Duration::from_millis(16);
            density.rebuild(&x, min, max, rect, now, &measure).expect("rebuild");
            density.advance(now);

            let target = density.target_spacing(min, max);
            let spacing = density.step() as f64;
            prop_assert!(spacing >= MIN_SPACING_RATIO * target - 1e-9);
            prop_assert!(spacing <= MAX_SPACING_RATIO * target + 1e-9);
            prop_assert!(!density.cells().is_empty());
            prop_assert!(density
                .cells()
                .windows(2)
                .all(|pair| pair[1].index() - pair[0].index() == density.step()));
        }
    }
}
