//! Tests for hover triggers and the delayed close.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use parasol::{
        OverlayId, OverlaySpec,
        geom::Rect,
        overlay::trigger::Trigger,
        settings::Settings,
        testing::{Harness, OpenLog},
        widgets::Popper,
    };

    fn hover(h: &mut Harness) -> (OverlayId, OpenLog) {
        h.mount(
            Popper::new("tip"),
            OverlaySpec::anchored(Rect::new(10, 10, 6, 1)).with_trigger(Trigger::Hover),
        )
    }

    #[test]
    fn reenter_within_delay_keeps_open() {
        let mut h = Harness::new();
        let (id, log) = hover(&mut h);

        h.move_to((12, 10));
        assert!(h.is_open(id));
        h.move_to((0, 0));
        h.advance(50);
        assert!(h.is_open(id));
        h.move_to((12, 10));
        h.advance(200);
        assert!(h.is_open(id));
        assert_eq!(log.calls(), vec![true]);
        assert_eq!(h.stage.pending_timers(), 0);
    }

    #[test]
    fn leave_without_reenter_closes_after_delay() {
        let mut h = Harness::new();
        let (id, log) = hover(&mut h);

        h.move_to((12, 10));
        h.move_to((0, 0));
        assert_eq!(h.stage.current_wait(), Some(Duration::from_millis(100)));
        h.advance(99);
        assert!(h.is_open(id));
        h.advance(1);
        assert!(!h.is_open(id));
        assert_eq!(log.calls(), vec![true, false]);
        assert_eq!(h.document_listeners(), 0);
    }

    #[test]
    fn moving_into_content_keeps_open() {
        let mut h = Harness::new();
        let (id, _) = hover(&mut h);
        h.move_to((12, 10));
        let area = h.stage.area(id).unwrap();
        h.move_to(area.tl);
        h.advance(500);
        assert!(h.is_open(id));

        h.move_to((70, 20));
        h.advance(100);
        assert!(!h.is_open(id));
    }

    #[test]
    fn zero_delay_closes_immediately() {
        let mut h = Harness::with_settings(Settings {
            hover_leave_delay_ms: 0,
            ..Settings::default()
        });
        let (id, _) = hover(&mut h);
        h.move_to((12, 10));
        h.move_to((0, 0));
        assert!(!h.is_open(id));
        assert_eq!(h.stage.pending_timers(), 0);
    }

    #[test]
    fn programmatic_close_cancels_pending_close() {
        let mut h = Harness::new();
        let (id, log) = h.mount(
            Popper::new("tip"),
            OverlaySpec::anchored(Rect::new(10, 10, 6, 1))
                .with_trigger(Trigger::Hover)
                .with_leave_delay(Duration::from_millis(30)),
        );
        h.move_to((12, 10));
        h.move_to((0, 0));
        assert_eq!(h.stage.pending_timers(), 1);
        h.stage.close(id).unwrap();
        assert_eq!(h.stage.pending_timers(), 0);
        h.stage.open(id).unwrap();
        h.advance(30);
        assert!(h.is_open(id));
        assert_eq!(log.calls(), vec![true, false, true]);
    }

    #[test]
    fn unmount_cancels_pending_close() {
        let mut h = Harness::new();
        let (id, _) = hover(&mut h);
        h.move_to((12, 10));
        h.move_to((0, 0));
        h.stage.unmount(id).unwrap();
        assert_eq!(h.stage.pending_timers(), 0);
        assert_eq!(h.stage.listener_total(), 0);
        h.advance(200);
    }

    #[test]
    fn hover_ignores_clicks() {
        let mut h = Harness::new();
        let (id, _) = hover(&mut h);
        h.click((12, 10));
        assert!(!h.is_open(id));
    }
}
