use float_cmp::approx_eq;
use rstest::rstest;
use sextant_common::canvas::{CanvasDimensions, DrawCall, RecordingRenderer};
use sextant_common::config::StyleConfig;
use sextant_common::types::Color;
use sextant_guides::{Figure, TickWhich};
use sextant_scales::scale::ScaleType;

const RED: Color = [1.0, 0.0, 0.0, 1.0];

fn dimensions() -> CanvasDimensions {
    CanvasDimensions {
        size: [640.0, 480.0],
        dpi: 72.0,
    }
}

fn figure_with_axes() -> Figure {
    let mut fig = Figure::new(dimensions(), StyleConfig::default()).unwrap();
    fig.add_axes([0.125, 0.11, 0.775, 0.77]);
    fig
}

#[test]
fn test_pool_grows_with_prototype_style_and_never_shrinks() {
    let mut fig = figure_with_axes();
    let mut renderer = RecordingRenderer::new(dimensions());
    {
        let axes = fig.get_mut(0).unwrap();
        axes.set_xlim(0.0, 10.0).unwrap();
        axes.set_xticks(vec![1.0, 2.0, 3.0]).unwrap();
    }
    fig.draw(&mut renderer).unwrap();
    assert_eq!(fig.get(0).unwrap().xaxis().major_ticks().len(), 3);

    // Restyle the prototype, then ask for more ticks than the pool holds
    let axes = fig.get_mut(0).unwrap();
    axes.xaxis_mut().major_pool_mut()[0].tick1_line.color = RED;
    axes.set_xticks((1..=7).map(f64::from).collect()).unwrap();
    fig.draw(&mut renderer).unwrap();

    let xaxis = fig.get(0).unwrap().xaxis();
    let ticks = xaxis.major_ticks();
    assert_eq!(ticks.len(), 7);
    assert_eq!(ticks[1].tick1_line.color, [0.0, 0.0, 0.0, 1.0]);
    assert!(ticks[3..].iter().all(|tick| tick.tick1_line.color == RED));
    let locs: Vec<f64> = ticks.iter().map(|tick| tick.loc()).collect();
    assert_eq!(locs, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);

    fig.get_mut(0)
        .unwrap()
        .set_xticks(vec![1.0, 2.0, 3.0])
        .unwrap();
    fig.draw(&mut renderer).unwrap();
    let xaxis = fig.get(0).unwrap().xaxis();
    assert_eq!(xaxis.major_ticks().len(), 3);
    assert_eq!(xaxis.major_pool().len(), 7);
    // Hidden slots keep their style for the next growth
    let pool = xaxis.major_pool();
    assert!(pool[1..3].iter().all(|tick| tick.tick1_line.color != RED));
    assert!(pool[3..].iter().all(|tick| tick.tick1_line.color == RED));
}

#[test]
fn test_log_axis_labels_decades() {
    let mut fig = figure_with_axes();
    {
        let axes = fig.get_mut(0).unwrap();
        axes.set_xlim(1.0, 1000.0).unwrap();
        axes.set_xscale(ScaleType::Log).unwrap();
    }
    let mut renderer = RecordingRenderer::new(dimensions());
    fig.draw(&mut renderer).unwrap();

    let texts: Vec<&str> = renderer.texts().collect();
    for label in ["1", "10", "100", "1000"] {
        assert!(texts.contains(&label), "missing {label} in {texts:?}");
    }

    // Decades are evenly spaced on screen
    let xs: Vec<f64> = renderer
        .calls
        .iter()
        .filter_map(|call| match call {
            DrawCall::Text { x, text, .. } if ["1", "10", "100", "1000"].contains(&text.as_str()) => {
                Some(*x)
            }
            _ => None,
        })
        .collect();
    assert_eq!(xs.len(), 4);
    let gap = xs[1] - xs[0];
    assert!(xs
        .windows(2)
        .all(|w| approx_eq!(f64, w[1] - w[0], gap, epsilon = 1e-6)));
}

#[rstest]
#[case(ScaleType::Linear, (0.0, 1.0))]
#[case(ScaleType::Log, (0.01, 100.0))]
fn test_flipped_renderer_mirrors_vertically(#[case] scale: ScaleType, #[case] ylim: (f64, f64)) {
    let draw = |flipy: bool| {
        let mut fig = figure_with_axes();
        let axes = fig.get_mut(0).unwrap();
        axes.set_ylim(ylim.0, ylim.1).unwrap();
        axes.set_yscale(scale).unwrap();
        axes.grid(Some(true), TickWhich::Major);
        axes.xaxis_mut().set_label_text("time");
        let mut renderer = RecordingRenderer::new(dimensions()).with_flipy(flipy);
        fig.draw(&mut renderer).unwrap();
        renderer.calls
    };
    let plain = draw(false);
    let flipped = draw(true);
    let height = dimensions().height();

    assert_eq!(plain.len(), flipped.len());
    for (a, b) in plain.iter().zip(&flipped) {
        match (a, b) {
            (DrawCall::Text { x: xa, y: ya, text: ta, .. }, DrawCall::Text { x: xb, y: yb, text: tb, .. }) => {
                assert_eq!(ta, tb);
                assert!(approx_eq!(f64, *xa, *xb));
                assert!(approx_eq!(f64, *yb, height - ya, epsilon = 1e-9));
            }
            (DrawCall::Line { points: pa, .. }, DrawCall::Line { points: pb, .. }) => {
                for (p, q) in pa.iter().zip(pb) {
                    assert!(approx_eq!(f64, q.x, p.x));
                    assert!(approx_eq!(f64, q.y, height - p.y, epsilon = 1e-9));
                }
            }
            (DrawCall::OpenGroup(ga), DrawCall::OpenGroup(gb))
            | (DrawCall::CloseGroup(ga), DrawCall::CloseGroup(gb)) => assert_eq!(ga, gb),
            (DrawCall::Rectangle { .. }, DrawCall::Rectangle { .. }) => {}
            (a, b) => panic!("call mismatch: {a:?} vs {b:?}"),
        }
    }
}
