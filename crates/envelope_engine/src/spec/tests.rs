use super::*;
use crate::model::{ParamBounds, ParameterStore};

fn three_point_arrays() -> EnvelopeArrays {
    EnvelopeArrays {
        x_refs: vec![None, Some("attack".into()), Some("release".into())],
        y_refs: vec![None, None, None],
        x_scales: vec![0.0, 0.5, 0.5],
        y_scales: vec![1.0, 1.0, 1.0],
        angles: None,
        curves: None,
    }
}

#[test]
fn test_new_uebernimmt_arrays_pro_index() {
    let spec = EnvelopeSpec::new(three_point_arrays()).expect("gültige Arrays");
    assert_eq!(spec.len(), 3);
    assert!(!spec.is_angle_mode());
    assert_eq!(spec.breakpoints()[1].x_ref.as_deref(), Some("attack"));
    assert_eq!(spec.breakpoints()[2].x_scale, 0.5);
    assert!(spec.filled());
}

#[test]
fn test_laengen_mismatch_ist_konfigurationsfehler() {
    let mut arrays = three_point_arrays();
    arrays.y_scales.pop();
    assert_eq!(
        EnvelopeSpec::new(arrays),
        Err(ConfigurationError::LengthMismatch {
            field: "y_scales",
            expected: 3,
            actual: 2
        })
    );

    let mut arrays = three_point_arrays();
    arrays.angles = Some(vec![TIME, 0.5]);
    assert!(matches!(
        EnvelopeSpec::new(arrays),
        Err(ConfigurationError::LengthMismatch {
            field: "angles",
            ..
        })
    ));
}

#[test]
fn test_weniger_als_zwei_breakpoints() {
    let arrays = EnvelopeArrays {
        x_refs: vec![None],
        y_refs: vec![None],
        x_scales: vec![1.0],
        y_scales: vec![1.0],
        angles: None,
        curves: None,
    };
    assert_eq!(
        EnvelopeSpec::new(arrays),
        Err(ConfigurationError::TooFewBreakpoints(1))
    );
}

#[test]
fn test_winkel_ausserhalb_bereich_abgelehnt() {
    let mut arrays = three_point_arrays();
    arrays.angles = Some(vec![TIME, 0.3, FRAC_PI_2]);
    assert!(matches!(
        EnvelopeSpec::new(arrays),
        Err(ConfigurationError::InvalidAngle { index: 2, .. })
    ));

    let mut arrays = three_point_arrays();
    arrays.angles = Some(vec![TIME, 0.3, 1.2]);
    let spec = EnvelopeSpec::new(arrays).expect("Winkel gültig");
    assert!(spec.is_angle_mode());
    assert!(!spec.breakpoints()[0].uses_angle());
    assert!(spec.breakpoints()[1].uses_angle());
}

#[test]
fn test_achse_und_stages_validiert() {
    let spec = EnvelopeSpec::new(three_point_arrays()).expect("gültig");
    assert_eq!(
        spec.clone().with_axis(1.0),
        Err(ConfigurationError::InvalidAxis(1.0))
    );
    assert!(spec.clone().with_axis(0.5).is_ok());

    let stages = StageGuides {
        sustain: Some(StageRef::Fixed(3)),
        ..Default::default()
    };
    assert!(matches!(
        spec.with_stages(stages),
        Err(ConfigurationError::StageOutOfRange { index: 3, len: 3, .. })
    ));
}

#[test]
fn test_curve_source_mitte_ist_gerade() {
    let curve = CurveSource::new("curve", 0.0, 126.0);
    let mut store = ParameterStore::new();
    assert_eq!(curve.amount(&store), 0.0);

    store.declare_with_value("curve", ParamBounds::int_range(0, 126), 0.0);
    assert_eq!(curve.amount(&store), -1.0);
    store.set("curve", 126.0);
    assert_eq!(curve.amount(&store), 1.0);
}

#[test]
fn test_stage_key_aufloesung() {
    let mut store = ParameterStore::new();
    let stage = StageRef::Key {
        key: "sustain_stage".into(),
        offset: 1,
    };
    assert_eq!(stage.resolve(&store, 5), None);
    store.set("sustain_stage", 2.0);
    assert_eq!(stage.resolve(&store, 5), Some(3));
    store.set("sustain_stage", 9.0);
    assert_eq!(stage.resolve(&store, 5), None);
}

#[test]
fn test_referenced_keys_ohne_duplikate() {
    let mut arrays = three_point_arrays();
    arrays.y_refs = vec![None, Some("attack".into()), Some("level".into())];
    arrays.curves = Some(vec![None, Some(CurveSource::new("shape", 0.0, 1.0)), None]);
    let spec = EnvelopeSpec::new(arrays)
        .expect("gültig")
        .with_stages(StageGuides {
            sustain: Some(StageRef::Key {
                key: "sus".into(),
                offset: 0,
            }),
            ..Default::default()
        })
        .expect("gültig");

    let referenced = spec.referenced_keys();
    let keys: Vec<&str> = referenced.iter().map(String::as_str).collect();
    assert_eq!(keys, vec!["attack", "shape", "release", "level", "sus"]);
}

#[test]
fn test_arrays_aus_toml() {
    let source = r#"
        x_refs = ["", "attack"]
        y_refs = ["", ""]
        x_scales = [0.0, 1.0]
        y_scales = [0.0, 1.0]
    "#;
    let parsed: Result<EnvelopeArrays, _> = toml::from_str(source);
    let arrays = parsed.expect("TOML parsebar");
    assert_eq!(arrays.x_refs[1].as_deref(), Some("attack"));
    assert!(arrays.angles.is_none());
}
