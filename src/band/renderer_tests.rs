//! Unit tests for the line-band renderer.

use super::*;
use crate::band::brush::{BandStyle, OpacitySource, Rgb};
use crate::buffer::LineIndex;
use crate::host::events::SnapshotId;
use crate::layer::VecLayer;
use crate::model::{BufferOffset, Extent, ViewportSnapshot};
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;

/// Test view over a [`LineIndex`], with a shared mutable viewport so tests
/// can move the viewport after the renderer takes ownership of a clone.
#[derive(Clone)]
struct FakeView {
    index: Rc<LineIndex>,
    viewport: Rc<Cell<ViewportSnapshot>>,
}

impl FakeView {
    fn with_lines(count: usize) -> Self {
        let text: String = (0..count)
            .map(|n| format!("line {n}\n"))
            .collect();
        Self {
            index: Rc::new(LineIndex::from_text(&text)),
            viewport: Rc::new(Cell::new(ViewportSnapshot::new(80.0, 0.0, 200))),
        }
    }

    fn set_viewport(&self, snapshot: ViewportSnapshot) {
        self.viewport.set(snapshot);
    }

    /// Layout for a contiguous run of lines, one host unit tall each.
    fn layouts(&self, lines: std::ops::Range<usize>) -> Vec<LineLayout> {
        lines
            .map(|n| {
                let line = crate::model::LineNumber::new(n);
                let extent = Extent::new(
                    self.index.line_start(line).unwrap(),
                    self.index.line_end(line).unwrap(),
                );
                LineLayout::new(extent, n as f64, 1.0)
            })
            .collect()
    }
}

impl TextView for FakeView {
    fn viewport(&self) -> ViewportSnapshot {
        self.viewport.get()
    }

    fn line_number_at(&self, offset: BufferOffset) -> crate::model::LineNumber {
        self.index.line_number_at(offset)
    }
}

fn style() -> BandStyle {
    BandStyle {
        tint: Rgb::default(),
        opacity: OpacitySource::Fixed(160),
    }
}

fn incremental(reformatted: Vec<LineLayout>) -> LayoutChanged {
    LayoutChanged {
        old_snapshot: SnapshotId::new(1),
        new_snapshot: SnapshotId::new(1),
        includes_line_edits: false,
        reformatted,
        visible: vec![],
    }
}

fn structural(visible: Vec<LineLayout>) -> LayoutChanged {
    LayoutChanged {
        old_snapshot: SnapshotId::new(1),
        new_snapshot: SnapshotId::new(2),
        includes_line_edits: true,
        reformatted: vec![],
        visible,
    }
}

fn band_line_numbers(view: &FakeView, layer: &VecLayer) -> Vec<usize> {
    let mut numbers: Vec<usize> = layer
        .bands()
        .iter()
        .map(|(extent, _)| view.line_number_at(extent.start).get())
        .collect();
    numbers.sort_unstable();
    numbers
}

mod construction {
    use super::*;

    #[test]
    fn missing_view_fails_with_attach_error() {
        let result = LineBandRenderer::<FakeView, VecLayer>::new(None, VecLayer::new(), style());
        assert_eq!(result.err(), Some(AttachError::MissingView));
    }

    #[test]
    fn construction_creates_no_bands() {
        let view = FakeView::with_lines(10);
        let renderer = LineBandRenderer::new(Some(view), VecLayer::new(), style()).unwrap();
        assert!(renderer.layer().is_empty());
    }

    #[test]
    fn fixed_opacity_ignores_viewport_background() {
        let view = FakeView::with_lines(2);
        view.set_viewport(ViewportSnapshot::new(80.0, 0.0, 42));
        let renderer = LineBandRenderer::new(Some(view), VecLayer::new(), style()).unwrap();
        assert_eq!(renderer.brush().alpha(), 160);
    }

    #[test]
    fn viewport_opacity_is_sampled_once_at_construction() {
        let view = FakeView::with_lines(2);
        view.set_viewport(ViewportSnapshot::new(80.0, 0.0, 42));
        let renderer = LineBandRenderer::new(
            Some(view.clone()),
            VecLayer::new(),
            BandStyle {
                tint: Rgb::default(),
                opacity: OpacitySource::FromViewport,
            },
        )
        .unwrap();
        assert_eq!(renderer.brush().alpha(), 42);

        // Later background changes are not tracked.
        view.set_viewport(ViewportSnapshot::new(80.0, 0.0, 255));
        assert_eq!(renderer.brush().alpha(), 42);
    }
}

mod refresh {
    use super::*;

    #[test]
    fn bands_cover_exactly_the_odd_lines() {
        let view = FakeView::with_lines(10);
        let mut renderer =
            LineBandRenderer::new(Some(view.clone()), VecLayer::new(), style()).unwrap();

        renderer
            .handle_layout_changed(&incremental(view.layouts(0..10)))
            .unwrap();

        assert_eq!(band_line_numbers(&view, renderer.layer()), vec![1, 3, 5, 7, 9]);
    }

    #[test]
    fn refresh_is_idempotent() {
        let view = FakeView::with_lines(10);
        let mut renderer =
            LineBandRenderer::new(Some(view.clone()), VecLayer::new(), style()).unwrap();

        let event = incremental(view.layouts(0..10));
        renderer.handle_layout_changed(&event).unwrap();
        let first = renderer.layer().bands();
        renderer.handle_layout_changed(&event).unwrap();

        assert_eq!(renderer.layer().bands(), first);
        assert_eq!(renderer.layer().len(), 5, "no duplicate bands");
    }

    #[test]
    fn band_geometry_comes_from_line_and_viewport() {
        let view = FakeView::with_lines(4);
        view.set_viewport(ViewportSnapshot::new(120.0, 8.0, 200));
        let mut renderer =
            LineBandRenderer::new(Some(view.clone()), VecLayer::new(), style()).unwrap();

        renderer
            .handle_layout_changed(&incremental(view.layouts(0..4)))
            .unwrap();

        let bands = renderer.layer().bands();
        for (extent, band) in &bands {
            let line = view.line_number_at(extent.start);
            assert_eq!(band.top, line.get() as f64);
            assert_eq!(band.height, 1.0);
            assert_eq!(band.width, 120.0);
            assert_eq!(band.left, 8.0);
            assert_eq!(band.fill, renderer.brush());
        }
    }

    #[test]
    fn order_of_input_lines_does_not_matter() {
        let view = FakeView::with_lines(6);
        let mut forward =
            LineBandRenderer::new(Some(view.clone()), VecLayer::new(), style()).unwrap();
        let mut reversed =
            LineBandRenderer::new(Some(view.clone()), VecLayer::new(), style()).unwrap();

        let mut lines = view.layouts(0..6);
        forward
            .handle_layout_changed(&incremental(lines.clone()))
            .unwrap();
        lines.reverse();
        reversed.handle_layout_changed(&incremental(lines)).unwrap();

        assert_eq!(
            band_line_numbers(&view, forward.layer()),
            band_line_numbers(&view, reversed.layer())
        );
    }

    #[test]
    fn wrapped_segments_of_an_odd_line_each_get_a_band() {
        let view = FakeView::with_lines(4);
        let mut renderer =
            LineBandRenderer::new(Some(view.clone()), VecLayer::new(), style()).unwrap();

        // Two visual segments of logical line 1: same line number, distinct
        // extents and heights, as a soft-wrapping host would report them.
        let line = crate::model::LineNumber::new(1);
        let start = view.index.line_start(line).unwrap();
        let end = view.index.line_end(line).unwrap();
        let mid = BufferOffset::new(start.get() + 3);
        let segments = vec![
            LineLayout::new(Extent::new(start, mid), 1.0, 1.0),
            LineLayout::new(Extent::new(mid, end), 2.0, 1.5),
        ];

        renderer
            .handle_layout_changed(&incremental(segments))
            .unwrap();

        let bands = renderer.layer().bands();
        assert_eq!(bands.len(), 2);
        let heights: Vec<f64> = bands.iter().map(|(_, b)| b.height).collect();
        assert_eq!(heights, vec![1.0, 1.5]);
    }

    #[test]
    fn even_lines_do_not_disturb_existing_bands() {
        let view = FakeView::with_lines(10);
        let mut renderer =
            LineBandRenderer::new(Some(view.clone()), VecLayer::new(), style()).unwrap();

        renderer
            .handle_layout_changed(&incremental(view.layouts(0..10)))
            .unwrap();
        // Re-deliver only even lines: nothing added, nothing removed.
        renderer
            .handle_layout_changed(&incremental(
                view.layouts(0..10)
                    .into_iter()
                    .filter(|l| !view.line_number_at(l.extent.start).is_odd())
                    .collect(),
            ))
            .unwrap();

        assert_eq!(band_line_numbers(&view, renderer.layer()), vec![1, 3, 5, 7, 9]);
    }
}

mod layout_dispatch {
    use super::*;

    #[test]
    fn full_invalidation_rebuilds_from_visible_set() {
        let view = FakeView::with_lines(10);
        let mut renderer =
            LineBandRenderer::new(Some(view.clone()), VecLayer::new(), style()).unwrap();

        renderer
            .handle_layout_changed(&incremental(view.layouts(0..10)))
            .unwrap();
        assert_eq!(renderer.layer().len(), 5);

        renderer
            .handle_layout_changed(&structural(view.layouts(0..5)))
            .unwrap();

        assert_eq!(
            band_line_numbers(&view, renderer.layer()),
            vec![1, 3],
            "bands for lines 5, 7, 9 must not survive a structural edit"
        );
    }

    #[test]
    fn snapshot_change_without_line_edits_takes_incremental_path() {
        let view = FakeView::with_lines(10);
        let mut renderer =
            LineBandRenderer::new(Some(view.clone()), VecLayer::new(), style()).unwrap();

        renderer
            .handle_layout_changed(&incremental(view.layouts(0..10)))
            .unwrap();

        // Cosmetic-only snapshot change: reformatted subset drives the pass,
        // the visible set is ignored, existing bands stay.
        let event = LayoutChanged {
            old_snapshot: SnapshotId::new(1),
            new_snapshot: SnapshotId::new(2),
            includes_line_edits: false,
            reformatted: view.layouts(2..4),
            visible: view.layouts(0..3),
        };
        renderer.handle_layout_changed(&event).unwrap();

        assert_eq!(band_line_numbers(&view, renderer.layer()), vec![1, 3, 5, 7, 9]);
    }

    #[test]
    fn incremental_pass_touches_only_reported_lines() {
        let view = FakeView::with_lines(10);
        let mut renderer =
            LineBandRenderer::new(Some(view.clone()), VecLayer::new(), style()).unwrap();

        renderer
            .handle_layout_changed(&incremental(view.layouts(0..10)))
            .unwrap();
        let untouched: Vec<_> = renderer
            .layer()
            .bands()
            .into_iter()
            .filter(|(extent, _)| {
                let n = view.line_number_at(extent.start).get();
                n != 2 && n != 3
            })
            .collect();

        renderer
            .handle_layout_changed(&incremental(view.layouts(2..4)))
            .unwrap();

        // Lines 1, 5, 7, 9: bit-identical bands. Line 3: still present.
        // Line 2: still no band.
        for (extent, band) in &untouched {
            assert_eq!(renderer.layer().band_for(extent), Some(band));
        }
        assert_eq!(band_line_numbers(&view, renderer.layer()), vec![1, 3, 5, 7, 9]);
    }
}

mod viewport_broadcast {
    use super::*;

    #[test]
    fn width_change_updates_every_band_width() {
        let view = FakeView::with_lines(10);
        let mut renderer =
            LineBandRenderer::new(Some(view.clone()), VecLayer::new(), style()).unwrap();
        renderer
            .handle_layout_changed(&incremental(view.layouts(0..10)))
            .unwrap();
        let before = renderer.layer().len();

        renderer.handle_viewport_width_changed(&ViewportWidthChanged { width: 200.0 });

        assert_eq!(renderer.layer().len(), before, "no adds or removes");
        renderer.layer().for_each(&mut |_, band| {
            assert_eq!(band.width, 200.0);
        });
    }

    #[test]
    fn width_change_leaves_positions_alone() {
        let view = FakeView::with_lines(10);
        let mut renderer =
            LineBandRenderer::new(Some(view.clone()), VecLayer::new(), style()).unwrap();
        renderer
            .handle_layout_changed(&incremental(view.layouts(0..10)))
            .unwrap();
        let before = renderer.layer().bands();

        renderer.handle_viewport_width_changed(&ViewportWidthChanged { width: 200.0 });

        for ((extent, old), (_, new)) in before.iter().zip(renderer.layer().bands().iter()) {
            assert_eq!(renderer.layer().band_for(extent).unwrap(), new);
            assert_eq!(old.left, new.left);
            assert_eq!(old.top, new.top);
            assert_eq!(old.height, new.height);
        }
    }

    #[test]
    fn left_change_updates_every_band_position() {
        let view = FakeView::with_lines(10);
        let mut renderer =
            LineBandRenderer::new(Some(view.clone()), VecLayer::new(), style()).unwrap();
        renderer
            .handle_layout_changed(&incremental(view.layouts(0..10)))
            .unwrap();
        let before = renderer.layer().bands();

        renderer.handle_viewport_left_changed(&ViewportLeftChanged { left: 16.0 });

        assert_eq!(renderer.layer().len(), before.len());
        for ((_, old), (_, new)) in before.iter().zip(renderer.layer().bands().iter()) {
            assert_eq!(new.left, 16.0);
            assert_eq!(old.width, new.width);
            assert_eq!(old.height, new.height);
            assert_eq!(old.top, new.top);
        }
    }

    #[test]
    fn broadcasts_on_empty_layer_are_no_ops() {
        let view = FakeView::with_lines(4);
        let mut renderer = LineBandRenderer::new(Some(view), VecLayer::new(), style()).unwrap();
        renderer.handle_viewport_width_changed(&ViewportWidthChanged { width: 200.0 });
        renderer.handle_viewport_left_changed(&ViewportLeftChanged { left: 16.0 });
        assert!(renderer.layer().is_empty());
    }
}

mod error_propagation {
    use super::*;

    #[derive(Debug, Error)]
    #[error("adornment layer is full")]
    struct LayerFull;

    /// Layer double that rejects every add, for asserting that host-layer
    /// failures pass through the renderer unmodified.
    #[derive(Default)]
    struct RejectingLayer;

    impl AdornmentLayer for RejectingLayer {
        type Error = LayerFull;

        fn add(&mut self, _extent: Extent, _band: Band) -> Result<(), Self::Error> {
            Err(LayerFull)
        }

        fn remove_all(&mut self) {}
        fn for_each(&self, _f: &mut dyn FnMut(&Extent, &Band)) {}
        fn for_each_mut(&mut self, _f: &mut dyn FnMut(&Extent, &mut Band)) {}
        fn len(&self) -> usize {
            0
        }
    }

    #[test]
    fn rejected_add_propagates_from_layout_handler() {
        let view = FakeView::with_lines(4);
        let mut renderer =
            LineBandRenderer::new(Some(view.clone()), RejectingLayer, style()).unwrap();

        let err = renderer
            .handle_layout_changed(&incremental(view.layouts(0..4)))
            .unwrap_err();
        assert_eq!(err.to_string(), "adornment layer is full");
    }

    #[test]
    fn rejected_add_surfaces_through_dispatch() {
        let view = FakeView::with_lines(4);
        let mut events = ViewEvents::new();
        let _binding = attach(Some(view.clone()), RejectingLayer, style(), &mut events).unwrap();

        let err = events
            .layout
            .dispatch(&incremental(view.layouts(0..4)))
            .unwrap_err();
        assert_eq!(err.to_string(), "adornment layer is full");
    }
}

mod wiring {
    use super::*;

    #[test]
    fn attach_registers_three_handlers() {
        let view = FakeView::with_lines(4);
        let mut events = ViewEvents::new();
        let _binding = attach(Some(view), VecLayer::new(), style(), &mut events).unwrap();

        assert_eq!(events.layout.handler_count(), 1);
        assert_eq!(events.width.handler_count(), 1);
        assert_eq!(events.left.handler_count(), 1);
    }

    #[test]
    fn attach_with_missing_view_registers_nothing() {
        let mut events = ViewEvents::new();
        let result = attach::<FakeView, VecLayer>(None, VecLayer::new(), style(), &mut events);

        assert_eq!(result.err(), Some(AttachError::MissingView));
        assert_eq!(events.layout.handler_count(), 0);
        assert_eq!(events.width.handler_count(), 0);
        assert_eq!(events.left.handler_count(), 0);
    }

    #[test]
    fn dispatched_events_drive_the_renderer() {
        let view = FakeView::with_lines(10);
        let mut events = ViewEvents::new();
        let binding = attach(Some(view.clone()), VecLayer::new(), style(), &mut events).unwrap();

        events
            .layout
            .dispatch(&incremental(view.layouts(0..10)))
            .unwrap();
        events
            .width
            .dispatch(&ViewportWidthChanged { width: 200.0 })
            .unwrap();

        let renderer = binding.renderer().borrow();
        assert_eq!(renderer.layer().len(), 5);
        renderer.layer().for_each(&mut |_, band| {
            assert_eq!(band.width, 200.0);
        });
    }

    #[test]
    fn detach_cancels_all_subscriptions() {
        let view = FakeView::with_lines(4);
        let mut events = ViewEvents::new();
        let binding = attach(Some(view.clone()), VecLayer::new(), style(), &mut events).unwrap();

        binding.detach();
        events
            .layout
            .dispatch(&incremental(view.layouts(0..4)))
            .unwrap();

        assert_eq!(events.layout.handler_count(), 0);
        assert_eq!(events.width.handler_count(), 0);
        assert_eq!(events.left.handler_count(), 0);
    }
}
