use telechart::core::{Point, Rect};
use telechart::render::{
    ArcPrimitive, Color, DrawCommand, LinePrimitive, RecordingSurface, RectPrimitive, Stroke,
    Surface, TextHAlign, TextPrimitive,
};

fn scripted_frame(surface: &mut dyn Surface) {
    let stroke = Stroke::new(1.0, Color::rgb(0.9, 0.9, 0.9));
    surface
        .draw_segments(&[LinePrimitive::new(0.0, 10.0, 200.0, 10.0, stroke)])
        .expect("segment");
    surface.save();
    surface.clip(Rect::new(0.0, 0.0, 200.0, 80.0));
    surface
        .draw_polyline(
            &[Point::new(0.0, 70.0), Point::new(100.0, 20.0), Point::new(200.0, 40.0)],
            Stroke::new(2.0, Color::rgb(0.24, 0.76, 0.25)),
        )
        .expect("polyline");
    surface
        .fill_polygon(
            &[Point::new(0.0, 80.0), Point::new(100.0, 30.0), Point::new(200.0, 80.0)],
            Color::rgba(0.2, 0.4, 0.8, 0.5),
        )
        .expect("polygon");
    surface.restore();
    surface
        .draw_arc(&ArcPrimitive {
            center: Point::new(100.0, 50.0),
            radius: 30.0,
            start_angle: 0.0,
            sweep_angle: std::f64::consts::PI,
            fill: Color::rgb(0.95, 0.3, 0.27),
            wedge: true,
        })
        .expect("arc");
    surface
        .draw_rect(
            &RectPrimitive::filled(Rect::new(120.0, 5.0, 70.0, 40.0), Color::rgb(1.0, 1.0, 1.0))
                .with_border(Stroke::new(1.0, Color::rgb(0.8, 0.8, 0.8)))
                .with_corner_radius(6.0),
        )
        .expect("rect");
    surface
        .draw_text(&TextPrimitive::new(
            "Jan 5",
            100.0,
            95.0,
            12.0,
            Color::rgb(0.5, 0.5, 0.5),
            TextHAlign::Center,
        ))
        .expect("text");
}

#[test]
fn recorded_frame_replays_command_for_command() {
    let area = Rect::from_size(200.0, 100.0);
    let mut source = RecordingSurface::new(area);
    scripted_frame(&mut source);
    let frame = source.take_frame();
    frame.validate().expect("valid frame");
    assert_eq!(frame.commands.len(), 9);

    let mut copy = RecordingSurface::new(area);
    frame.replay(&mut copy).expect("replay");
    assert_eq!(copy.frame(), &frame);
}

#[test]
fn invalid_primitives_never_reach_the_frame() {
    let mut surface = RecordingSurface::new(Rect::from_size(100.0, 100.0));
    let bad_stroke = Stroke::new(0.0, Color::rgb(0.0, 0.0, 0.0));
    assert!(surface.draw_segments(&[LinePrimitive::new(0.0, 0.0, 1.0, 1.0, bad_stroke)]).is_err());
    let black = Color::rgb(0.0, 0.0, 0.0);
    let empty_text = TextPrimitive::new("", 0.0, 0.0, 12.0, black, TextHAlign::Left);
    assert!(surface.draw_text(&empty_text).is_err());
    let negative = RectPrimitive::filled(Rect::new(0.0, 0.0, -5.0, 5.0), black);
    assert!(surface.draw_rect(&negative).is_err());
    assert!(surface.frame().is_empty());
}

#[test]
fn unbalanced_restore_fails_validation() {
    let mut surface = RecordingSurface::new(Rect::from_size(100.0, 100.0));
    surface.restore();
    assert_eq!(surface.frame().commands, vec![DrawCommand::Restore]);
    assert!(surface.frame().validate().is_err());
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend {
    use super::scripted_frame;
    use telechart::render::{CairoSurface, Color, Surface};

    #[test]
    fn cairo_surface_draws_scripted_frame() {
        let mut surface = CairoSurface::new(200, 100).expect("cairo surface");
        surface.clear(Color::rgb(1.0, 1.0, 1.0)).expect("clear");
        scripted_frame(&mut surface);
        let stats = surface.stats();
        assert_eq!(stats.segments_drawn, 1);
        assert_eq!(stats.paths_drawn, 2);
        assert_eq!(stats.arcs_drawn, 1);
        assert_eq!(stats.rects_drawn, 1);
        assert_eq!(stats.texts_drawn, 1);
        assert!(surface.measure_text("Jan 5", 12.0) > 0.0);
        assert!(surface.image().is_some());
    }

    #[test]
    fn non_positive_size_is_rejected() {
        assert!(CairoSurface::new(0, 100).is_err());
    }
}
