//! Tests for imperatively opened modals and their reconciliation into the
//! stage.

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc, time::Duration};

    use parasol::{
        OverlayId, Stage,
        event::{key::KeyCode, mouse::MouseEvent},
        geom::Point,
        instance::Handle,
        style::Size,
        widgets::{Modal, ModalPatch, ModalProps, StaticModals},
    };

    const EXIT: Duration = Duration::from_millis(150);

    /// Props whose close callback bumps the returned counter.
    fn counted(title: &str) -> (ModalProps, Rc<Cell<u32>>) {
        let n = Rc::new(Cell::new(0));
        let c = n.clone();
        let props = ModalProps::new(title, "body").with_on_close(move || c.set(c.get() + 1));
        (props, n)
    }

    fn overlay(modals: &StaticModals, h: &Handle<ModalProps>) -> Option<OverlayId> {
        modals.registry().borrow().overlay(h.id())
    }

    fn title(stage: &mut Stage, id: OverlayId) -> String {
        stage
            .with_widget::<Modal, _>(id, |m| m.props().title.clone())
            .unwrap()
    }

    #[test]
    fn open_mounts_on_sync() {
        let mut stage = Stage::new();
        let modals = StaticModals::new(EXIT);
        let h = modals.open(ModalProps::new("Hello", "world"));
        assert!(stage.is_empty());
        assert!(!h.is_closed());

        modals.sync(&mut stage).unwrap();
        let id = overlay(&modals, &h).unwrap();
        assert!(stage.is_open(id));
        assert_eq!(title(&mut stage, id), "Hello");

        let area = stage.area(id).unwrap();
        let vp = stage.viewport();
        assert_eq!(area.tl.x, (vp.w - area.w) / 2);
        assert_eq!(area.tl.y, (vp.h - area.h) / 2);
    }

    #[test]
    fn update_keeps_the_mounted_overlay() {
        let mut stage = Stage::new();
        let modals = StaticModals::new(EXIT);
        let h = modals.open(ModalProps::new("a", "body"));
        modals.sync(&mut stage).unwrap();
        let id = overlay(&modals, &h).unwrap();

        h.update(ModalPatch::title("b"));
        h.update(ModalPatch {
            size: Some(Size::Large),
            ..Default::default()
        });
        modals.sync(&mut stage).unwrap();

        assert_eq!(overlay(&modals, &h), Some(id));
        assert_eq!(stage.len(), 1);
        assert_eq!(title(&mut stage, id), "b");
        let props = h.props().unwrap();
        assert_eq!(props.title, "b");
        assert_eq!(props.content, "body");
        assert_eq!(props.size, Size::Large);
        assert_eq!(modals.registry().borrow().revision(h.id()), Some(2));
    }

    #[test]
    fn close_is_idempotent_and_waits_for_exit() {
        let mut stage = Stage::new();
        let modals = StaticModals::new(EXIT);
        let (props, closes) = counted("a");
        let h = modals.open(props);
        modals.sync(&mut stage).unwrap();
        let id = overlay(&modals, &h).unwrap();

        h.close();
        h.close();
        assert!(h.is_closed());
        h.update(ModalPatch::title("ignored"));
        modals.sync(&mut stage).unwrap();
        assert_eq!(closes.get(), 1);
        assert!(stage.contains(id));
        assert!(!stage.is_open(id));
        assert_eq!(modals.live(), 1);

        stage.advance(EXIT - Duration::from_millis(1));
        assert!(stage.contains(id));
        stage.advance(Duration::from_millis(1));
        assert!(!stage.contains(id));

        modals.sync(&mut stage).unwrap();
        assert_eq!(modals.live(), 0);
        assert_eq!(closes.get(), 1);
        h.close();
        modals.sync(&mut stage).unwrap();
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn zero_exit_delay_releases_in_one_sync() {
        let mut stage = Stage::new();
        let modals = StaticModals::new(Duration::ZERO);
        let h = modals.open(ModalProps::new("a", "b"));
        modals.sync(&mut stage).unwrap();
        h.close();
        modals.sync(&mut stage).unwrap();
        assert!(stage.is_empty());
        assert_eq!(modals.live(), 0);
        assert_eq!(stage.listener_total(), 0);
    }

    #[test]
    fn escape_dismissal_reports_close_once() {
        let mut stage = Stage::new();
        let modals = StaticModals::new(EXIT);
        let (props, closes) = counted("a");
        let h = modals.open(props);
        modals.sync(&mut stage).unwrap();
        let id = overlay(&modals, &h).unwrap();

        stage.key(KeyCode::Esc);
        assert!(!stage.is_open(id));
        modals.sync(&mut stage).unwrap();
        assert_eq!(closes.get(), 1);
        assert!(h.is_closed());

        h.close();
        modals.sync(&mut stage).unwrap();
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn gates_come_from_props() {
        let mut stage = Stage::new();
        let modals = StaticModals::new(EXIT);
        let h = modals.open(ModalProps {
            should_close_when_press_esc: false,
            should_close_when_click_backdrop: false,
            ..ModalProps::new("a", "b")
        });
        modals.sync(&mut stage).unwrap();
        let id = overlay(&modals, &h).unwrap();

        stage.key(KeyCode::Esc);
        stage.mouse(MouseEvent::down(Point::new(0, 0)));
        assert!(stage.is_open(id));

        h.update(ModalPatch {
            should_close_when_click_backdrop: Some(true),
            ..Default::default()
        });
        modals.sync(&mut stage).unwrap();
        stage.mouse(MouseEvent::down(Point::new(0, 0)));
        assert!(!stage.is_open(id));
    }

    #[test]
    fn instances_are_independent() {
        let mut stage = Stage::new();
        let modals = StaticModals::new(EXIT);
        let (pa, ca) = counted("a");
        let (pb, cb) = counted("b");
        let a = modals.open(pa);
        let b = modals.open(pb);
        modals.sync(&mut stage).unwrap();
        assert_eq!(stage.len(), 2);

        a.close();
        modals.sync(&mut stage).unwrap();
        assert_eq!((ca.get(), cb.get()), (1, 0));
        let ob = overlay(&modals, &b).unwrap();
        assert!(stage.is_open(ob));
        assert!(!b.is_closed());
    }

    #[test]
    fn close_before_sync_never_mounts() {
        let mut stage = Stage::new();
        let modals = StaticModals::new(EXIT);
        let (props, closes) = counted("a");
        let h = modals.open(props);
        h.close();
        modals.sync(&mut stage).unwrap();
        assert!(stage.is_empty());
        assert_eq!(modals.live(), 0);
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn handle_outlives_manager() {
        let modals = StaticModals::new(EXIT);
        let h = modals.open(ModalProps::new("a", "b"));
        drop(modals);
        assert!(h.is_closed());
        h.close();
        h.update(ModalPatch::content("c"));
        assert!(h.props().is_none());
    }
}
