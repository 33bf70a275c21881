use altinput::controller::{
    AxisKind, AxisRange, DeviceId, HardwareError, PovPosition, StaticBackend, StaticDevice,
};
use altinput::mapping::{ControlType, MappingType};
use altinput::source::{ConfigSource, MemorySource};
use altinput::{load, LoadError, LoadOutcome, Settings, Snapshot};

fn settings() -> Settings {
    Settings {
        modes: vec!["Flight".into(), "Rover".into(), "EVA".into()],
        ..Settings::default()
    }
}

fn x52() -> StaticDevice {
    StaticDevice::new("x52-0", "Saitek X52 Flight Control System")
        .with_axis(AxisKind::X, AxisRange::new(0, 2047))
        .with_axis(AxisKind::Y, AxisRange::new(0, 2047))
        .with_axis(AxisKind::Z, AxisRange::new(0, 255))
        .with_axis(AxisKind::RotationZ, AxisRange::new(0, 1023))
        .with_axis(AxisKind::Slider0, AxisRange::new(0, 255))
        .with_buttons(34)
        .with_povs(1)
}

fn pedals() -> StaticDevice {
    StaticDevice::new("pedals-0", "CH Pro Pedals USB")
        .with_axis(AxisKind::X, AxisRange::new(0, 255))
        .with_axis(AxisKind::Y, AxisRange::new(0, 255))
        .with_axis(AxisKind::Z, AxisRange::new(128, 128))
}

fn source() -> MemorySource {
    MemorySource::new()
        .with("global", "Version", "1.4")
        .with("X52", "Interface", "DirectInput")
        .with("X52", "DeadZone", "0.05")
        .with("X52", "AxisX", "roll")
        .with("X52", "AxisY", "pitch")
        .with("X52", "AxisY.Inverted", "true")
        .with("X52", "AxisZ", "mainThrottle")
        .with("X52", "Slider1.Min", "throttle.Delta -0.1")
        .with("X52", "Slider1.Max", "throttle.Delta 0.1")
        .with("X52", "Slider1.Continuous", "true")
        .with("X52", "POV1.Up", "pitch.Delta 0.05")
        .with("X52", "POV1.Down", "pitch.Delta -0.05")
        .with("X52", "Button1", "toggleStage")
        .with("X52", "Button2", "toggleGear")
        .with("X52.Rover", "AxisX", "wheelSteer")
        .with("X52.Rover", "AxisX.Factor", "0.5")
        .with("X52.Rover", "Button2", "toggleBrakes")
        .with("X52.Rover", "Button2.Continuous", "true")
        .with("Pedals", "Interface", "DirectInput")
        .with("Pedals", "AxisZ", "yaw")
        .with("Pedals", "AxisX", "leftBrake 1.0")
}

fn run(source: MemorySource, devices: Vec<StaticDevice>) -> Result<Snapshot, LoadError> {
    let mut backend = StaticBackend::new(devices);
    load(&settings(), Some(Box::new(source)), &mut backend)
}

#[test]
fn test_full_load() {
    let snapshot = run(source(), vec![x52(), pedals()]).unwrap();
    assert_eq!(snapshot.outcome, LoadOutcome::Loaded);
    assert_eq!(snapshot.devices.len(), 2);
    assert_eq!(
        snapshot.detected,
        vec![
            "Detected Controller 'Saitek X52 Flight Control System': 5 Axes, 34 Buttons, 1 POV(s)",
            "Detected Controller 'CH Pro Pedals USB': 3 Axes, 0 Buttons, 0 POV(s)",
        ]
    );

    let x52 = snapshot.devices.get(&DeviceId::new("x52-0")).unwrap();
    assert_eq!(x52.section, "X52");
    assert_eq!(x52.enabled_modes, vec![true, true, false]);
    assert_eq!(x52.available_axes().count(), 5);

    let x = x52.axis(AxisKind::X).unwrap();
    assert_eq!(x.mapping1[0].action, "roll");
    assert_eq!(x.mapping1[1].action, "wheelSteer");
    assert_eq!(x.controls[0].factor, 1.0);
    assert_eq!(x.controls[1].factor, 0.5);
    assert_eq!(x.controls[0].dead_zone, 0.05);

    let y = x52.axis(AxisKind::Y).unwrap();
    assert!(y.controls[0].inverted);
    assert!(y.controls[1].inverted);

    let slider = x52.axis(AxisKind::Slider0).unwrap();
    assert_eq!(slider.controls[0].control_type, ControlType::Continuous);
    assert_eq!(slider.mapping1[0].mapping_type, MappingType::Delta);
    assert_eq!(slider.mapping1[0].action, "throttle");
    assert_eq!(slider.mapping2[0].value, 0.1);

    let pov = x52.pov(1).unwrap();
    assert_eq!(
        pov.position(PovPosition::Down).unwrap().mappings[0].value,
        -0.05
    );

    let button = x52.button(2).unwrap();
    assert_eq!(button.mappings[0].action, "toggleGear");
    assert_eq!(button.mappings[1].action, "toggleBrakes");
    assert!(!button.continuous[0]);
    assert!(button.continuous[1]);
    assert!(!button.mappings[2].is_mapped());
}

#[test]
fn test_zero_width_axis_is_unavailable() {
    let snapshot = run(source(), vec![pedals()]).unwrap();
    let pedals = snapshot.devices.get(&DeviceId::new("pedals-0")).unwrap();

    let z = pedals.axis(AxisKind::Z).unwrap();
    assert!(!z.is_available);
    assert!(z.mapping1.iter().all(|m| !m.is_mapped()));

    let x = pedals.axis(AxisKind::X).unwrap();
    assert_eq!(x.mapping1[0].mapping_type, MappingType::Absolute);
    assert_eq!(x.mapping1[0].value, 1.0);
}

#[test]
fn test_loading_twice_gives_equal_devices() {
    let first = run(source(), vec![x52(), pedals()]).unwrap();
    let second = run(source(), vec![x52(), pedals()]).unwrap();
    assert_eq!(first.devices, second.devices);
    assert_eq!(first.detected, second.detected);
}

#[test]
fn test_version_gate() {
    let source = source().with("global", "Version", "1.3");
    let snapshot = run(source, vec![x52()]).unwrap();
    assert!(snapshot.devices.is_empty());
    assert!(snapshot.detected.is_empty());
    assert_eq!(
        snapshot.outcome,
        LoadOutcome::VersionMismatch {
            found: "1.3".to_string(),
            expected: "1.4".to_string(),
        }
    );
}

#[test]
fn test_missing_source() {
    let mut backend = StaticBackend::new(vec![x52()]);
    let snapshot = load(&settings(), None, &mut backend).unwrap();
    assert_eq!(snapshot.outcome, LoadOutcome::MissingSource);
    assert!(snapshot.devices.is_empty());
}

#[test]
fn test_first_matching_section_wins() {
    let source = MemorySource::new()
        .with("global", "Version", "1.4")
        .with("Saitek", "Interface", "DirectInput")
        .with("Saitek", "AxisX", "yaw")
        .with("X52", "Interface", "DirectInput")
        .with("X52", "AxisX", "roll");
    let snapshot = run(source, vec![x52()]).unwrap();

    assert_eq!(snapshot.devices.len(), 1);
    let device = snapshot.devices.iter().next().unwrap();
    assert_eq!(device.section, "Saitek");
    assert_eq!(device.axis(AxisKind::X).unwrap().mapping1[0].action, "yaw");
}

#[test]
fn test_unsupported_interface_falls_through() {
    let source = MemorySource::new()
        .with("global", "Version", "1.4")
        .with("Saitek", "Interface", "XInput")
        .with("X52", "Interface", "DirectInput")
        .with("X52", "AxisX", "roll");
    let snapshot = run(source, vec![x52()]).unwrap();
    assert_eq!(snapshot.devices.iter().next().unwrap().section, "X52");

    let case = MemorySource::new()
        .with("global", "Version", "1.4")
        .with("X52", "Interface", "directinput");
    assert!(run(case, vec![x52()]).unwrap().devices.is_empty());
}

#[test]
fn test_class_must_be_game_control() {
    let source = MemorySource::new()
        .with("global", "Version", "1.4")
        .with("Saitek", "Interface", "DirectInput")
        .with("Saitek", "Class", "Keyboard")
        .with("X52", "Interface", "DirectInput")
        .with("X52", "Class", "GameControl");
    let snapshot = run(source, vec![x52()]).unwrap();
    assert_eq!(snapshot.devices.iter().next().unwrap().section, "X52");
}

#[test]
fn test_ignored_section_stops_matching() {
    let source = MemorySource::new()
        .with("global", "Version", "1.4")
        .with("Saitek", "Interface", "DirectInput")
        .with("Saitek", "Ignore", "true")
        .with("X52", "Interface", "DirectInput");
    let snapshot = run(source, vec![x52()]).unwrap();
    assert!(snapshot.devices.is_empty());
    assert_eq!(snapshot.detected.len(), 1);

    let no_interface = MemorySource::new()
        .with("global", "Version", "1.4")
        .with("Saitek", "AxisX", "roll")
        .with("X52", "Interface", "DirectInput");
    assert!(run(no_interface, vec![x52()]).unwrap().devices.is_empty());
}

#[test]
fn test_mode_sections_are_not_candidates() {
    let source = MemorySource::new()
        .with("global", "Version", "1.4")
        .with("Saitek X52.Flight", "Interface", "DirectInput")
        .with("Saitek X52.Flight", "AxisX", "roll");
    let snapshot = run(source, vec![x52()]).unwrap();
    assert!(snapshot.devices.is_empty());
}

#[test]
fn test_identical_devices_are_kept_apart() {
    let twin = StaticDevice::new("x52-1", "Saitek X52 Flight Control System")
        .with_axis(AxisKind::X, AxisRange::new(0, 2047));
    let snapshot = run(source(), vec![x52(), twin]).unwrap();
    assert_eq!(snapshot.devices.len(), 2);
    assert!(snapshot.devices.contains(&DeviceId::new("x52-1")));
}

#[test]
fn test_hardware_failure_aborts_the_load() {
    let mut backend = StaticBackend::new(vec![x52()]).with_axis_error(
        "x52-0",
        AxisKind::Y,
        HardwareError::Backend("device removed".into()),
    );
    let source: Box<dyn ConfigSource> = Box::new(source());
    let result = load(&settings(), Some(source), &mut backend);
    assert!(matches!(
        result,
        Err(LoadError::Hardware(HardwareError::Backend(_)))
    ));
}

#[test]
fn test_hardware_dead_zones_are_programmed() {
    let mut backend = StaticBackend::new(vec![x52()]);
    let source = source().with("X52", "AxisZ.DeadZone", "0.25");
    load(&settings(), Some(Box::new(source)), &mut backend).unwrap();

    let id = DeviceId::new("x52-0");
    assert_eq!(backend.dead_zone(&id, AxisKind::X), Some(500));
    assert_eq!(backend.dead_zone(&id, AxisKind::Z), Some(2500));
    assert_eq!(backend.dead_zone(&id, AxisKind::Slider0), None);
}

#[test]
fn test_out_of_range_dead_zones_are_not_programmed() {
    let mut backend = StaticBackend::new(vec![x52()]);
    let source = source()
        .with("X52", "AxisX.DeadZone", "5")
        .with("X52", "AxisY.DeadZone", "-0.2")
        .with("X52", "AxisZ.DeadZone", "NaN");
    let snapshot = load(&settings(), Some(Box::new(source)), &mut backend).unwrap();

    let id = DeviceId::new("x52-0");
    for axis in [AxisKind::X, AxisKind::Y, AxisKind::Z] {
        assert_eq!(backend.dead_zone(&id, axis), Some(500), "{}", axis);
        let entry = snapshot.devices.get(&id).unwrap().axis(axis).unwrap();
        assert_eq!(entry.controls[0].dead_zone, 0.05);
    }
}

#[test]
fn test_dead_zones_do_not_outlive_a_reload() {
    let mut backend = StaticBackend::new(vec![x52()]);
    let id = DeviceId::new("x52-0");

    load(&settings(), Some(Box::new(source())), &mut backend).unwrap();
    assert_eq!(backend.dead_zone(&id, AxisKind::X), Some(500));

    let unmatched = MemorySource::new()
        .with("global", "Version", "1.4")
        .with("Pedals", "Interface", "DirectInput");
    let snapshot = load(&settings(), Some(Box::new(unmatched)), &mut backend).unwrap();
    assert!(snapshot.devices.is_empty());
    assert_eq!(backend.dead_zone(&id, AxisKind::X), None);
}
