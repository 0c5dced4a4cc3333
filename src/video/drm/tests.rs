use {
    crate::video::drm::{
        Change, ConnectorStatus, ConnectorType, DrmConnector, DrmCrtc, DrmModeInfo, DrmPlane,
        DrmProperty, drm_mode_modeinfo,
    },
    std::mem,
};

fn mode_1080p() -> DrmModeInfo {
    DrmModeInfo {
        clock: 148500,
        hdisplay: 1920,
        hsync_start: 2008,
        hsync_end: 2052,
        htotal: 2200,
        hskew: 0,
        vdisplay: 1080,
        vsync_start: 1084,
        vsync_end: 1089,
        vtotal: 1125,
        vscan: 0,
        vrefresh: 60,
        flags: 5,
        ty: 0x48,
        name: "1920x1080".into(),
    }
}

#[test]
fn modeinfo_layout() {
    assert_eq!(mem::size_of::<drm_mode_modeinfo>(), 68);
}

#[test]
fn modeinfo_roundtrip() {
    let mode = mode_1080p();
    let raw = mode.to_raw();
    assert_eq!(&raw.name[..9], b"1920x1080");
    assert!(raw.name[9..].iter().all(|b| *b == 0));
    assert_eq!(DrmModeInfo::from(raw), mode);
}

#[test]
fn modeinfo_long_name_is_truncated() {
    let mut mode = mode_1080p();
    mode.name = "x".repeat(40).into();
    let raw = mode.to_raw();
    assert!(raw.name.iter().all(|b| *b == b'x'));
}

#[test]
fn refresh_rate() {
    assert_eq!(mode_1080p().refresh_rate_millihz(), 60000);
    let mut mode = mode_1080p();
    mode.htotal = 0;
    assert_eq!(mode.refresh_rate_millihz(), 60000);
    assert_eq!(mode_1080p().to_string(), "1920 x 1080 @ 60.000 Hz");
}

#[test]
fn change_groups_consecutive_objects() {
    let mut change = Change::default();
    assert!(change.is_empty());
    change.change_object(DrmPlane(31), |c| {
        c.change(DrmProperty(1), 10);
        c.change(DrmProperty(2), 20);
    });
    change.change_object(DrmPlane(31), |c| c.change(DrmProperty(3), 30));
    change.change_object(DrmCrtc(40), |c| c.change_opt(None, 1));
    change.change_object(DrmConnector(50), |c| c.change_opt(Some(DrmProperty(4)), 40));
    assert!(!change.is_empty());
    let entries: Vec<_> = change.iter().collect();
    assert_eq!(
        entries,
        [
            (31, DrmProperty(1), 10),
            (31, DrmProperty(2), 20),
            (31, DrmProperty(3), 30),
            (50, DrmProperty(4), 40),
        ]
    );
    assert_eq!(change.objects, [31, 50]);
    assert_eq!(change.object_lengths, [3, 1]);
}

#[test]
fn connector_type_names() {
    for v in 0..=21 {
        assert_eq!(ConnectorType::from_drm(v).to_drm(), v);
    }
    assert_eq!(ConnectorType::from_drm(14), ConnectorType::eDP);
    assert_eq!(ConnectorType::eDP.to_string(), "eDP");
    assert_eq!(ConnectorType::Unknown(99).to_string(), "Unknown(99)");
    assert_eq!(
        ConnectorStatus::from_drm(ConnectorStatus::Connected.to_drm()),
        ConnectorStatus::Connected
    );
}
