use std::time::Duration;

use telechart::core::{Rect, Series};
use telechart::pipeline::{DetailOverlayLayer, PieLayer};
use telechart::render::{Color, RecordingSurface};
use telechart::transition::{OPAQUE, TRANSPARENT};
use telechart::{
    ChartEngine, ChartEngineConfig, ChartError, ChartEvent, ChartKind, ChartLinesData,
    ColumnSource, Count, SeriesId, SeriesKind, Timestamp,
};

const AREA: Rect = Rect::from_size(640.0, 384.0);

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn ramp(id: &str, kind: SeriesKind) -> Series<Count> {
    Series::new(id, id, kind, Color::rgb(0.25, 0.5, 0.75), (0..100).map(Count).collect())
}

fn data(lines: Vec<Series<Count>>) -> ChartLinesData<Count, Count> {
    ChartLinesData::new(Series::x_axis((0..100).map(Count).collect()), lines).expect("valid data")
}

fn engine() -> ChartEngine<Count, Count> {
    ChartEngine::new(ChartEngineConfig::default()).expect("engine init")
}

#[test]
fn attaching_settles_on_the_window_bounds() {
    let mut engine = engine();
    engine
        .attach_data(data(vec![ramp("y0", SeriesKind::Line)]), 80, 99)
        .expect("attach");

    let target = engine.target_bounds().expect("bounds");
    assert_eq!((target.min_y, target.max_y), (Count(80), Count(99)));
    assert_eq!(engine.current_bounds(), Some(target));
    assert_eq!(engine.visible_window(), Some((80, 99)));
    assert_eq!(engine.chart_kind(), Some(ChartKind::Line));
}

#[test]
fn widening_the_window_animates_only_the_y_range() {
    let mut engine = engine();
    engine
        .attach_data(data(vec![ramp("y0", SeriesKind::Line)]), 80, 99)
        .expect("attach");
    engine.set_visible_window(0, 99).expect("window");

    let current = engine.current_bounds().expect("bounds");
    assert_eq!((current.min_x_index, current.max_x_index), (0, 99));
    assert_eq!(current.min_y, Count(80));

    assert!(engine.tick(ms(125)));
    assert_eq!(engine.current_bounds().expect("bounds").min_y, Count(40));

    engine.tick(ms(125));
    assert_eq!(engine.current_bounds().expect("bounds").min_y, Count(0));
    assert!(!engine.tick(ms(16)));
}

#[test]
fn hidden_stacked_series_stays_in_the_bounds_until_its_fade_ends() {
    let mut engine = engine();
    let stacked = data(vec![ramp("y0", SeriesKind::Line), ramp("y1", SeriesKind::Line)])
        .with_stacked(true);
    engine.attach_data(stacked, 0, 99).expect("attach");
    assert_eq!(engine.target_bounds().expect("bounds").max_y, Count(198));

    let y1 = SeriesId::new("y1");
    assert!(engine.set_series_visible(&y1, false).expect("toggle"));
    assert!(!engine.set_series_visible(&y1, false).expect("repeat toggle"));
    assert!(!engine.is_series_visible(&y1));
    assert!(engine.is_series_drawn(&y1));
    assert!(engine.hidden_series().contains(&y1));
    assert_eq!(engine.series_alpha(&y1), OPAQUE);
    assert_eq!(engine.target_bounds().expect("bounds").max_y, Count(198));

    engine.tick(ms(125));
    assert!(engine.series_alpha(&y1) < OPAQUE);
    assert!(engine.is_series_drawn(&y1));
    assert_eq!(engine.target_bounds().expect("bounds").max_y, Count(198));

    assert!(engine.tick(ms(125)));
    assert!(!engine.is_series_drawn(&y1));
    assert_eq!(engine.series_alpha(&y1), TRANSPARENT);
    assert_eq!(engine.target_bounds().expect("bounds").max_y, Count(99));
    assert_eq!(engine.current_bounds().expect("bounds").max_y, Count(198));

    engine.tick(ms(250));
    assert_eq!(engine.current_bounds().expect("bounds").max_y, Count(99));

    assert_eq!(
        engine.drain_events(),
        vec![ChartEvent::SeriesToggled { id: y1.clone(), visible: false }]
    );
    assert!(engine.drain_events().is_empty());
    assert!(matches!(
        engine.set_series_visible(&SeriesId::new("nope"), true),
        Err(ChartError::UnknownSeries(_))
    ));
}

#[test]
fn showing_a_series_again_rejoins_the_bounds_immediately() {
    let mut engine = engine();
    let stacked = data(vec![ramp("y0", SeriesKind::Line), ramp("y1", SeriesKind::Line)])
        .with_stacked(true);
    engine.attach_data(stacked, 0, 99).expect("attach");
    let y1 = SeriesId::new("y1");
    engine.set_series_visible(&y1, false).expect("toggle");
    engine.tick(ms(250));
    assert_eq!(engine.target_bounds().expect("bounds").max_y, Count(99));

    engine.set_series_visible(&y1, true).expect("toggle");
    assert!(engine.is_series_drawn(&y1));
    assert_eq!(engine.target_bounds().expect("bounds").max_y, Count(198));
}

#[test]
fn hiding_everything_keeps_the_previous_y_range() {
    let mut engine = engine();
    engine
        .attach_data(data(vec![ramp("y0", SeriesKind::Line)]), 10, 20)
        .expect("attach");
    engine.set_series_visible(&SeriesId::new("y0"), false).expect("toggle");
    engine.tick(ms(250));
    engine.set_visible_window(50, 60).expect("window");

    let target = engine.target_bounds().expect("bounds");
    assert_eq!((target.min_x_index, target.max_x_index), (50, 60));
    assert_eq!((target.min_y, target.max_y), (Count(10), Count(20)));
}

#[test]
fn percentage_contributions_follow_visibility() {
    let mut engine = engine();
    let shares = data(vec![
        Series::new("a", "A", SeriesKind::Area, Color::rgb(0.1, 0.2, 0.3), vec![Count(1); 100]),
        Series::new("b", "B", SeriesKind::Area, Color::rgb(0.3, 0.2, 0.1), vec![Count(3); 100]),
    ])
    .with_percentage(true);
    engine.attach_data(shares, 0, 99).expect("attach");
    assert_eq!(engine.chart_kind(), Some(ChartKind::PercentageArea));

    let before = engine.percentage_contributions(5).expect("shares");
    assert_eq!(before.as_slice(), &[0.25, 0.75]);

    engine.set_series_visible(&SeriesId::new("a"), false).expect("toggle");
    let fading = engine.percentage_contributions(5).expect("shares");
    assert_eq!(fading.as_slice(), &[0.25, 0.75]);

    engine.tick(ms(250));
    let after = engine.percentage_contributions(5).expect("shares");
    assert_eq!(after.as_slice(), &[0.0, 1.0]);
}

#[test]
fn rendering_before_attach_draws_nothing() {
    let mut engine = engine();
    let mut surface = RecordingSurface::new(AREA);
    let stats = engine.render(&mut surface, AREA).expect("frame");
    assert_eq!(stats.drawn, 0);
    assert!(surface.frame().is_empty());
    assert!(engine.set_visible_window(0, 1).is_err());
}

#[test]
fn invalid_rect_fails_the_frame_but_not_the_engine() {
    let mut engine = engine();
    engine
        .attach_data(data(vec![ramp("y0", SeriesKind::Line)]), 0, 99)
        .expect("attach");
    let mut surface = RecordingSurface::new(AREA);
    assert!(matches!(
        engine.render(&mut surface, Rect::from_size(-1.0, 10.0)),
        Err(ChartError::InvalidViewport { .. })
    ));
    let stats = engine.render(&mut surface, AREA).expect("frame");
    assert_eq!(stats.rebuilt.len(), 4);
}

#[test]
fn selection_builds_the_detail_overlay() {
    let raw = r##"{
        "columns": [
            ["x", 1546300800000, 1546387200000, 1546473600000, 1546560000000],
            ["y0", 37, 20, 32, 39],
            ["y1", 22, 12, 30, 40]
        ],
        "types": {"x": "x", "y0": "line", "y1": "line"},
        "names": {"y0": "Joined", "y1": "Left"},
        "colors": {"y0": "#3DC23F", "y1": "#F34C44"}
    }"##;
    let data = ColumnSource::from_json_str(raw)
        .and_then(ColumnSource::into_lines_data)
        .expect("valid source");
    let mut engine: ChartEngine<Timestamp, Count> =
        ChartEngine::new(ChartEngineConfig::default()).expect("engine init");
    engine.attach_data(data, 0, 3).expect("attach");

    assert_eq!(engine.select_at_position(0.0, AREA).expect("select"), Some(0));
    let mut surface = RecordingSurface::new(AREA);
    engine.render(&mut surface, AREA).expect("frame");

    let overlay = engine
        .pipeline()
        .find::<DetailOverlayLayer<Timestamp, Count>>()
        .expect("overlay");
    assert_eq!(overlay.rows(), vec!["Tue, Jan 1 2019", "Joined: 37", "Left: 22"]);
    assert_eq!(overlay.marker_count(), 2);

    engine.set_series_visible(&SeriesId::new("y1"), false).expect("toggle");
    engine.render(&mut surface, AREA).expect("frame");
    let overlay = engine
        .pipeline()
        .find::<DetailOverlayLayer<Timestamp, Count>>()
        .expect("overlay");
    assert_eq!(overlay.rows(), vec!["Tue, Jan 1 2019", "Joined: 37"]);

    assert!(engine.set_selected_index(Some(9)).is_err());
    engine.set_selected_index(None).expect("clear");
    engine.render(&mut surface, AREA).expect("frame");
    let overlay = engine
        .pipeline()
        .find::<DetailOverlayLayer<Timestamp, Count>>()
        .expect("overlay");
    assert!(overlay.rows().is_empty());
}

#[test]
fn selector_drag_moves_the_window_and_reports_it() {
    let mut engine = engine();
    engine
        .attach_data(data(vec![ramp("y0", SeriesKind::Line)]), 10, 60)
        .expect("attach");
    let overview = Rect::new(0.0, 0.0, 99.0, 40.0);

    assert!(engine.begin_window_drag(35.0, overview).is_some());
    assert_eq!(engine.drag_window(45.0, overview).expect("drag"), Some((20, 70)));
    assert_eq!(engine.drag_window(45.2, overview).expect("drag"), None);
    engine.end_window_drag();
    assert_eq!(engine.drag_window(80.0, overview).expect("drag"), None);

    assert_eq!(engine.visible_window(), Some((20, 70)));
    assert_eq!(
        engine.drain_events(),
        vec![ChartEvent::WindowChanged { min_x_index: 20, max_x_index: 70 }]
    );
}

#[test]
fn pie_mode_swaps_the_points_layer() {
    let mut engine = engine();
    let shares = data(vec![
        Series::new("a", "A", SeriesKind::Area, Color::rgb(0.1, 0.2, 0.3), vec![Count(1); 100]),
        Series::new("b", "B", SeriesKind::Area, Color::rgb(0.2, 0.3, 0.4), vec![Count(1); 100]),
        Series::new("c", "C", SeriesKind::Area, Color::rgb(0.3, 0.4, 0.5), vec![Count(2); 100]),
    ])
    .with_percentage(true);
    engine.attach_data(shares, 0, 9).expect("attach");
    engine.set_pie_mode(true);
    assert_eq!(engine.chart_kind(), Some(ChartKind::Pie));
    assert_eq!(engine.pipeline().layer_names().as_slice(), &["pie-points"]);
    assert!(engine.label_cells().is_empty());

    let mut surface = RecordingSurface::new(AREA);
    engine.render(&mut surface, AREA).expect("frame");
    let pie = engine
        .pipeline()
        .find::<PieLayer<Count, Count>>()
        .expect("pie layer");
    let percents: Vec<u32> = pie.slices().iter().map(|slice| slice.percent).collect();
    assert_eq!(percents, vec![25, 25, 50]);
    assert_eq!(pie.window_sum(2), Some(Count(20)));
    assert_eq!(surface.frame().arcs().count(), 3);

    engine.set_visible_window(0, 19).expect("window");
    engine.render(&mut surface, AREA).expect("frame");
    let pie = engine
        .pipeline()
        .find::<PieLayer<Count, Count>>()
        .expect("pie layer");
    assert_eq!(pie.window_sum(2), Some(Count(40)));

    engine.set_pie_mode(false);
    assert_eq!(engine.chart_kind(), Some(ChartKind::PercentageArea));
    assert!(engine.pipeline().layer_names().contains(&"x-axis-labels"));
}

#[test]
fn x_labels_track_the_window() {
    let mut engine = engine();
    engine
        .attach_data(data(vec![ramp("y0", SeriesKind::Line)]), 0, 99)
        .expect("attach");
    let mut surface = RecordingSurface::new(AREA);
    engine.render(&mut surface, AREA).expect("frame");
    let first: Vec<usize> = engine.label_cells().iter().map(|cell| cell.index()).collect();
    assert!(first.contains(&99));

    engine.set_visible_window(80, 99).expect("window");
    engine.render(&mut surface, AREA).expect("frame");
    assert!(engine.label_cells().iter().all(|cell| cell.index() >= 80));
    assert!(engine.tick(ms(16)));
}

#[test]
fn fading_a_line_only_rebuilds_when_it_leaves_the_drawn_set() {
    let mut engine = engine();
    let lines = data(vec![
        ramp("a", SeriesKind::Line),
        Series::new("b", "B", SeriesKind::Line, Color::rgb(0.8, 0.2, 0.2), vec![Count(50); 100]),
    ]);
    engine.attach_data(lines, 0, 99).expect("attach");
    let mut surface = RecordingSurface::new(AREA);
    engine.render(&mut surface, AREA).expect("frame");

    engine.set_series_visible(&SeriesId::new("b"), false).expect("toggle");
    let toggled = engine.render(&mut surface, AREA).expect("frame");
    assert!(toggled.rebuilt.contains(&"line-points"));

    for _ in 0..4 {
        engine.tick(ms(50));
        let stats = engine.render(&mut surface, AREA).expect("frame");
        assert!(stats.rebuilt.is_empty(), "rebuilt {:?}", stats.rebuilt);
    }

    engine.tick(ms(50));
    assert!(!engine.is_series_drawn(&SeriesId::new("b")));
    let dropped = engine.render(&mut surface, AREA).expect("frame");
    assert_eq!(dropped.rebuilt.as_slice(), &["line-points"]);
}

#[test]
fn scaled_series_animate_their_own_y_windows() {
    let mut engine = engine();
    let scaled = data(vec![
        ramp("small", SeriesKind::Line),
        Series::new(
            "large",
            "Large",
            SeriesKind::Line,
            Color::rgb(0.8, 0.2, 0.2),
            (0..100).map(|value| Count(value * 1_000)).collect(),
        ),
    ])
    .with_y_scaled(true);
    engine.attach_data(scaled, 50, 99).expect("attach");
    assert_eq!(engine.chart_kind(), Some(ChartKind::ScaledLine));

    let small = SeriesId::new("small");
    let large = SeriesId::new("large");
    let window = |engine: &ChartEngine<Count, Count>, id: &SeriesId| {
        let bounds = engine.series_bounds(id).expect("series bounds");
        (bounds.min_y, bounds.max_y)
    };
    assert_eq!(window(&engine, &small), (Count(50), Count(99)));
    assert_eq!(window(&engine, &large), (Count(50_000), Count(99_000)));

    engine.set_visible_window(0, 49).expect("window");
    engine.tick(ms(125));
    assert_eq!(window(&engine, &small), (Count(25), Count(74)));
    assert_eq!(window(&engine, &large), (Count(25_000), Count(74_000)));

    engine.tick(ms(125));
    assert_eq!(window(&engine, &small), (Count(0), Count(49)));
    assert_eq!(window(&engine, &large), (Count(0), Count(49_000)));
}
