use {
    crate::{
        backends::kms::{
            KmsError,
            catalog::PropertyTable,
            pipeline::{Pipeline, PipelineError, ScreenSide, SplitRect, select_planes, split_rect},
            tests::fake::{HEIGHT, Panel, WIDTH},
            topology::LayerMixers,
        },
        video::drm::{DrmBlob, DrmDevice, DrmFb, DrmPlane},
    },
    std::rc::Rc,
};

fn pipeline(panel: &Panel, dev: &Rc<dyn DrmDevice>, lms: LayerMixers) -> Pipeline {
    let connector_props = PropertyTable::collect(dev, panel.connector).unwrap();
    let crtc_props = PropertyTable::collect(dev, panel.crtc).unwrap();
    let planes = select_planes(dev, 0, lms, &[]).unwrap();
    Pipeline::new(
        dev,
        panel.connector,
        connector_props,
        panel.crtc,
        crtc_props,
        lms,
        &planes,
        WIDTH,
        HEIGHT,
    )
    .unwrap()
}

fn owned(entries: &[(u32, &str, u64)]) -> Vec<(u32, String, u64)> {
    entries
        .iter()
        .map(|(o, n, v)| (*o, n.to_string(), *v))
        .collect()
}

#[test]
fn split_dual() {
    let left = split_rect(1080, 2400, LayerMixers::Dual, 0);
    let right = split_rect(1080, 2400, LayerMixers::Dual, 1);
    assert_eq!(
        left,
        SplitRect {
            x: 0,
            y: 0,
            width: 540,
            height: 2400,
        }
    );
    assert_eq!(
        right,
        SplitRect {
            x: 540,
            y: 0,
            width: 540,
            height: 2400,
        }
    );
}

#[test]
fn split_single() {
    let full = split_rect(1080, 2400, LayerMixers::Single, 0);
    assert_eq!(
        full,
        SplitRect {
            x: 0,
            y: 0,
            width: 1080,
            height: 2400,
        }
    );
}

#[test]
fn setup_dual() {
    let panel = Panel::new(None);
    let dev = panel.dev();
    let p = pipeline(&panel, &dev, LayerMixers::Dual);
    assert_eq!(p.planes.len(), 2);
    assert_eq!(p.planes[0].side, ScreenSide::Left);
    assert_eq!(p.planes[1].side, ScreenSide::Right);
    let change = p.setup(DrmFb(77), DrmBlob(88)).unwrap();
    let s = panel.state();
    let entries = s.named(&change.iter().collect::<Vec<_>>());
    let (c, crtc, l, r) = (panel.connector.0, panel.crtc.0, panel.planes[0].0, panel.planes[1].0);
    let crtc_id = crtc as u64;
    assert_eq!(
        entries,
        owned(&[
            (c, "CRTC_ID", crtc_id),
            (crtc, "MODE_ID", 88),
            (crtc, "ACTIVE", 1),
            (l, "zpos", 0),
            (l, "FB_ID", 77),
            (l, "SRC_X", 0),
            (l, "SRC_Y", 0),
            (l, "SRC_W", 400 << 16),
            (l, "SRC_H", 480 << 16),
            (l, "CRTC_X", 0),
            (l, "CRTC_Y", 0),
            (l, "CRTC_W", 400),
            (l, "CRTC_H", 480),
            (l, "CRTC_ID", crtc_id),
            (r, "zpos", 0),
            (r, "FB_ID", 77),
            (r, "SRC_X", 400 << 16),
            (r, "SRC_Y", 0),
            (r, "SRC_W", 400 << 16),
            (r, "SRC_H", 480 << 16),
            (r, "CRTC_X", 400),
            (r, "CRTC_Y", 0),
            (r, "CRTC_W", 400),
            (r, "CRTC_H", 480),
            (r, "CRTC_ID", crtc_id),
        ])
    );
}

#[test]
fn single_uses_one_plane() {
    let panel = Panel::new(None);
    let dev = panel.dev();
    let p = pipeline(&panel, &dev, LayerMixers::Single);
    assert_eq!(p.planes.len(), 1);
    let plane = panel.planes[0].0;
    let setup = p.setup(DrmFb(5), DrmBlob(6)).unwrap();
    let teardown = p.teardown().unwrap();
    let s = panel.state();
    for change in [&setup, &teardown] {
        let planes: Vec<_> = change
            .iter()
            .map(|(obj, _, _)| obj)
            .filter(|obj| *obj != panel.connector.0 && *obj != panel.crtc.0)
            .collect();
        assert!(planes.iter().all(|obj| *obj == plane));
    }
    let entries = s.named(&setup.iter().collect::<Vec<_>>());
    assert!(entries.contains(&(plane, "SRC_W".to_string(), (WIDTH as u64) << 16)));
    assert!(entries.contains(&(plane, "CRTC_W".to_string(), WIDTH as u64)));
    assert!(entries.contains(&(plane, "CRTC_X".to_string(), 0)));
}

#[test]
fn teardown_dual() {
    let panel = Panel::new(None);
    let dev = panel.dev();
    let p = pipeline(&panel, &dev, LayerMixers::Dual);
    let change = p.teardown().unwrap();
    let s = panel.state();
    let (c, crtc, l, r) = (panel.connector.0, panel.crtc.0, panel.planes[0].0, panel.planes[1].0);
    assert_eq!(
        s.named(&change.iter().collect::<Vec<_>>()),
        owned(&[
            (c, "CRTC_ID", 0),
            (crtc, "MODE_ID", 0),
            (crtc, "ACTIVE", 0),
            (l, "CRTC_ID", 0),
            (l, "FB_ID", 0),
            (r, "CRTC_ID", 0),
            (r, "FB_ID", 0),
        ])
    );
}

#[test]
fn update_fb_binds_connector_and_planes() {
    let panel = Panel::new(None);
    let dev = panel.dev();
    let p = pipeline(&panel, &dev, LayerMixers::Dual);
    let change = p.update_fb(DrmFb(99));
    let s = panel.state();
    let (c, l, r) = (panel.connector.0, panel.planes[0].0, panel.planes[1].0);
    assert_eq!(
        s.named(&change.iter().collect::<Vec<_>>()),
        owned(&[
            (c, "CRTC_ID", panel.crtc.0 as u64),
            (l, "FB_ID", 99),
            (r, "FB_ID", 99),
        ])
    );
}

#[test]
fn missing_optional_properties_are_skipped() {
    let panel = Panel::new(None);
    {
        let mut s = panel.state_mut();
        s.remove_prop(panel.crtc.0, "MODE_ID");
        s.remove_prop(panel.planes[0].0, "zpos");
    }
    let dev = panel.dev();
    let p = pipeline(&panel, &dev, LayerMixers::Single);
    let change = p.setup(DrmFb(1), DrmBlob(2)).unwrap();
    let s = panel.state();
    let names: Vec<_> = s
        .named(&change.iter().collect::<Vec<_>>())
        .into_iter()
        .map(|(_, n, _)| n)
        .collect();
    assert!(!names.contains(&"MODE_ID".to_string()));
    assert!(!names.contains(&"zpos".to_string()));
    assert!(names.contains(&"ACTIVE".to_string()));
}

#[test]
fn missing_plane_property_aborts() {
    let panel = Panel::new(None);
    panel.state_mut().remove_prop(panel.planes[1].0, "SRC_W");
    let dev = panel.dev();
    let p = pipeline(&panel, &dev, LayerMixers::Dual);
    match p.setup(DrmFb(1), DrmBlob(2)) {
        Err(PipelineError::MissingPlaneProperty(plane, "SRC_W")) => {
            assert_eq!(plane, panel.planes[1])
        }
        r => panic!("unexpected result {:?}", r.map(|_| ())),
    }
    assert!(p.teardown().is_ok());
}

#[test]
fn missing_fb_id_is_fatal() {
    let panel = Panel::new(None);
    panel.state_mut().remove_prop(panel.planes[0].0, "FB_ID");
    let dev = panel.dev();
    let connector_props = PropertyTable::collect(&dev, panel.connector).unwrap();
    let crtc_props = PropertyTable::collect(&dev, panel.crtc).unwrap();
    let res = Pipeline::new(
        &dev,
        panel.connector,
        connector_props,
        panel.crtc,
        crtc_props,
        LayerMixers::Single,
        &panel.planes[..1],
        WIDTH,
        HEIGHT,
    );
    assert!(matches!(
        res,
        Err(KmsError::Pipeline(PipelineError::MissingPlaneProperty(_, "FB_ID")))
    ));
}

#[test]
fn plane_prop_only_sees_active_planes() {
    let panel = Panel::new(None);
    let dev = panel.dev();
    let connector_props = PropertyTable::collect(&dev, panel.connector).unwrap();
    let crtc_props = PropertyTable::collect(&dev, panel.crtc).unwrap();
    let p = Pipeline::new(
        &dev,
        panel.connector,
        connector_props,
        panel.crtc,
        crtc_props,
        LayerMixers::Single,
        &panel.planes[..2],
        WIDTH,
        HEIGHT,
    )
    .unwrap();
    let expected = panel.state().prop(panel.planes[0].0, "SRC_X");
    assert_eq!(p.plane_prop(panel.planes[0], "SRC_X").unwrap(), expected);
    assert!(matches!(
        p.plane_prop(panel.planes[1], "SRC_X"),
        Err(PipelineError::UnknownPlane(_))
    ));
    assert!(matches!(
        p.plane_prop(DrmPlane(1), "SRC_X"),
        Err(PipelineError::UnknownPlane(_))
    ));
    assert!(matches!(
        p.plane_prop(panel.planes[0], "rotation"),
        Err(PipelineError::MissingPlaneProperty(_, "rotation"))
    ));
}

#[test]
fn plane_selection() {
    let panel = Panel::new(None);
    {
        let mut s = panel.state_mut();
        s.planes[0].possible_crtcs = 0b10;
    }
    let dev = panel.dev();
    let planes = select_planes(&dev, 0, LayerMixers::Dual, &[]).unwrap();
    assert_eq!(&planes[..], &panel.planes[1..3]);
    let planes = select_planes(&dev, 0, LayerMixers::Dual, &[panel.planes[1]]).unwrap();
    assert_eq!(&planes[..], &[panel.planes[2], panel.planes[3]]);
    let res = select_planes(&dev, 0, LayerMixers::Dual, &panel.planes[1..3]);
    assert!(matches!(res, Err(KmsError::NotEnoughPlanes(2, 1))));
    let planes = select_planes(&dev, 1, LayerMixers::Single, &[]).unwrap();
    assert_eq!(&planes[..], &panel.planes[..1]);
}
