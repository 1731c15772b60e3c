//! End-to-end tests for the flattening engine and the serde bridge.

use chrono::{DateTime, Utc};
use flatnote::{
    from_serialize, inspect, modifier, notation, Error, FlattenOptions, Flattener, Item, Mode,
    Modified, Value,
};
use std::collections::BTreeMap;
use std::fmt;

struct Specs {
    length: f64,
    crew: u32,
    shielded: bool,
}
inspect!(Specs {
    length as "length_m",
    crew,
    shielded,
});

struct Ship {
    name: String,
    class: String,
    specs: Specs,
    holds: Vec<Hold>,
    flags: BTreeMap<String, bool>,
    escort: Option<Box<Ship>>,
}
inspect!(Ship {
    name,
    class as "-",
    specs,
    holds,
    flags,
    escort,
});

struct Hold {
    label: String,
    tonnage: u16,
}
inspect!(Hold { label, tonnage });

fn freighter() -> Ship {
    let mut flags = BTreeMap::new();
    flags.insert("armed".to_string(), false);
    flags.insert("insured".to_string(), true);
    Ship {
        name: "Hauler".to_string(),
        class: "Bulk".to_string(),
        specs: Specs {
            length: 310.5,
            crew: 12,
            shielded: false,
        },
        holds: vec![
            Hold {
                label: "fore".to_string(),
                tonnage: 800,
            },
            Hold {
                label: "aft".to_string(),
                tonnage: 0,
            },
        ],
        flags,
        escort: None,
    }
}

fn keys(items: &[Item]) -> Vec<&str> {
    items.iter().map(|i| i.key.as_str()).collect()
}

#[test]
fn test_nested_notation_keeps_everything() {
    let items = notation(&freighter(), Mode::NoSkipEmpty, ".").unwrap();
    assert_eq!(
        keys(&items),
        [
            "Ship.name",
            "Ship.class",
            "Ship.specs.length_m",
            "Ship.specs.crew",
            "Ship.specs.shielded",
            "Ship.holds[0].label",
            "Ship.holds[0].tonnage",
            "Ship.holds[1].label",
            "Ship.holds[1].tonnage",
            "Ship.flags[armed]",
            "Ship.flags[insured]",
        ]
    );
}

#[test]
fn test_nested_notation_skip_empty() {
    let items = notation(&freighter(), Mode::SkipEmpty, ".").unwrap();
    assert_eq!(
        keys(&items),
        [
            "Ship.name",
            "Ship.class",
            "Ship.specs.length_m",
            "Ship.specs.crew",
            "Ship.holds[0].label",
            "Ship.holds[0].tonnage",
            "Ship.holds[1].label",
            "Ship.flags[insured]",
        ]
    );
}

#[test]
fn test_width_fidelity_end_to_end() {
    struct Widths {
        a: i8,
        b: u16,
        c: f32,
        d: i64,
        e: usize,
    }
    inspect!(Widths { a, b, c, d, e });

    let widths = Widths {
        a: -8,
        b: 16,
        c: 0.32,
        d: -64,
        e: 99,
    };
    let items = notation(&widths, Mode::NoSkipEmpty, ".").unwrap();
    assert_eq!(items[0].value, Value::I8(-8));
    assert_eq!(items[1].value, Value::U16(16));
    assert_eq!(items[2].value, Value::F32(0.32));
    assert_eq!(items[3].value, Value::I64(-64));
    assert_eq!(items[4].value, Value::Usize(99));
}

#[test]
fn test_custom_glue() {
    let items = notation(&freighter(), Mode::SkipEmpty, "/").unwrap();
    assert_eq!(items[2].key, "Ship/specs/length_m");
    // bracket segments never involve the glue
    assert_eq!(items[5].key, "Ship/holds[0]/tonnage");
}

#[test]
fn test_present_escort_descends_one_level() {
    let mut ship = freighter();
    ship.escort = Some(Box::new(Ship {
        name: "Scout".to_string(),
        class: String::new(),
        specs: Specs {
            length: 20.0,
            crew: 1,
            shielded: true,
        },
        holds: Vec::new(),
        flags: BTreeMap::new(),
        escort: None,
    }));

    let items = notation(&ship, Mode::SkipEmpty, ".").unwrap();
    assert!(items.iter().any(|i| i.key == "Ship.escort.name"
        && i.value == Value::from("Scout")));
    assert!(items
        .iter()
        .any(|i| i.key == "Ship.escort.specs.shielded" && i.value == Value::Bool(true)));
}

#[test]
fn test_map_key_formatting_by_kind() {
    let mut by_int: BTreeMap<i32, u8> = BTreeMap::new();
    by_int.insert(-1, 10);
    by_int.insert(2, 20);
    let items = notation(&by_int, Mode::NoSkipEmpty, ".").unwrap();
    assert_eq!(keys(&items), ["[-1]", "[2]"]);

    let mut by_bool: BTreeMap<bool, u8> = BTreeMap::new();
    by_bool.insert(false, 1);
    by_bool.insert(true, 2);
    let items = notation(&by_bool, Mode::NoSkipEmpty, ".").unwrap();
    assert_eq!(keys(&items), ["[false]", "[true]"]);
}

#[test]
fn test_indexmap_entries_keep_insertion_order() {
    struct Rates {
        by_rate: indexmap::IndexMap<String, f64>,
    }
    inspect!(Rates { by_rate });

    // IndexMap keeps insertion order, so the notation is deterministic
    let mut by_rate = indexmap::IndexMap::new();
    by_rate.insert("base".to_string(), 0.1);
    by_rate.insert("peak".to_string(), 0.2);
    let items = notation(&Rates { by_rate }, Mode::NoSkipEmpty, ".").unwrap();
    assert_eq!(keys(&items), ["Rates.by_rate[base]", "Rates.by_rate[peak]"]);
    assert_eq!(items[0].value, Value::F64(0.1));
}

#[test]
fn test_timestamp_modifier_end_to_end() {
    struct Event {
        label: String,
        at: DateTime<Utc>,
    }
    inspect!(Event { label, at });

    let flattener =
        Flattener::new(Mode::SkipEmpty, ".").register_modifier(modifier::timestamp());
    let event = Event {
        label: "dock".to_string(),
        at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
    };
    let items = flattener.notation(&event).unwrap();
    assert_eq!(keys(&items), ["Event.label", "Event.at"]);
    assert_eq!(items[1].value.as_str(), Some("2023-11-14T22:13:20Z"));

    // the default instant is empty and vanishes under SkipEmpty
    let unset = Event {
        label: "dock".to_string(),
        at: DateTime::<Utc>::default(),
    };
    let items = flattener.notation(&unset).unwrap();
    assert_eq!(keys(&items), ["Event.label"]);
}

#[test]
fn test_display_modifier_end_to_end() {
    struct Drink {
        title: String,
    }
    inspect!(Drink { title });
    impl fmt::Display for Drink {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{} is a good drink.", self.title)
        }
    }

    let drinks = vec![
        Drink {
            title: "Tea".to_string(),
        },
        Drink {
            title: "Milk".to_string(),
        },
    ];
    let flattener =
        Flattener::new(Mode::SkipEmpty, ".").register_modifier(modifier::display::<Drink>());
    let items = flattener.notation(&drinks).unwrap();
    assert_eq!(items[0].value, Value::from("Tea is a good drink."));
    assert_eq!(items[1].value, Value::from("Milk is a good drink."));
}

#[test]
fn test_unregistered_type_descends_normally() {
    struct Event {
        at: DateTime<Utc>,
    }
    inspect!(Event { at });

    // no modifier registered: the timestamp flattens to its components
    let event = Event {
        at: DateTime::from_timestamp(120, 5).unwrap(),
    };
    let items = notation(&event, Mode::NoSkipEmpty, ".").unwrap();
    assert_eq!(keys(&items), ["Event.at.secs", "Event.at.nanos"]);
    assert_eq!(items[0].value, Value::I64(120));
    assert_eq!(items[1].value, Value::U32(5));
}

#[test]
fn test_modifier_panic_surfaces_as_fault() {
    let flattener = Flattener::new(Mode::NoSkipEmpty, ".")
        .register_modifier(|_: &Hold| -> flatnote::Result<Modified> {
            panic!("hold inspection failed")
        });
    let err = flattener
        .notation(&vec![Hold {
            label: "fore".to_string(),
            tonnage: 1,
        }])
        .unwrap_err();
    match err {
        Error::ModifierFault { detail, .. } => assert_eq!(detail, "hold inspection failed"),
        other => panic!("expected a modifier fault, got {other}"),
    }
}

#[test]
fn test_serde_bridge_agrees_with_engine() {
    #[derive(serde::Serialize)]
    struct Probe {
        name: String,
        battery: f32,
        active: bool,
    }
    struct ProbeMirror {
        name: String,
        battery: f32,
        active: bool,
    }
    inspect!(ProbeMirror { name, battery, active });

    let probe = Probe {
        name: "Voyager".to_string(),
        battery: 0.42,
        active: true,
    };
    let mirror = ProbeMirror {
        name: probe.name.clone(),
        battery: probe.battery,
        active: probe.active,
    };

    let bridged = from_serialize(&probe, Mode::SkipEmpty, ".").unwrap();
    let engine = notation(&mirror, Mode::SkipEmpty, ".").unwrap();
    let bridged_keys: Vec<_> = bridged.iter().map(|i| i.key.replace("Probe", "")).collect();
    let engine_keys: Vec<_> = engine
        .iter()
        .map(|i| i.key.replace("ProbeMirror", ""))
        .collect();
    assert_eq!(bridged_keys, engine_keys);
    assert_eq!(
        bridged.iter().map(|i| &i.value).collect::<Vec<_>>(),
        engine.iter().map(|i| &i.value).collect::<Vec<_>>()
    );
}

#[test]
fn test_absent_sequence_element_is_invalid_value() {
    let values: Vec<Option<u8>> = vec![Some(1), None];
    for mode in [Mode::NoSkipEmpty, Mode::SkipEmpty] {
        let err = notation(&values, mode, ".").unwrap_err();
        assert!(matches!(err, Error::InvalidValue(_)));
        assert!(err.to_string().contains("Option<u8>"));
    }
}

#[test]
fn test_depth_limit_guards_deep_nesting() {
    struct Link {
        next: Option<Box<Link>>,
        id: u32,
    }
    inspect!(Link { next, id });

    let mut chain = Link { next: None, id: 0 };
    for id in 1..100 {
        chain = Link {
            next: Some(Box::new(chain)),
            id,
        };
    }

    let bounded = Flattener::with_options(FlattenOptions::new().with_max_depth(10));
    let err = bounded.notation(&chain).unwrap_err();
    assert!(matches!(err, Error::DepthExceeded(10)));

    let roomy = Flattener::with_options(FlattenOptions::new().with_max_depth(500));
    assert_eq!(roomy.notation(&chain).unwrap().len(), 100);
}

#[test]
fn test_complex_leaves() {
    use num_complex::Complex64;

    struct Signal {
        amplitude: Complex64,
    }
    inspect!(Signal { amplitude });

    let signal = Signal {
        amplitude: Complex64::new(0.5, -1.5),
    };
    let items = notation(&signal, Mode::NoSkipEmpty, ".").unwrap();
    assert_eq!(items[0].key, "Signal.amplitude");
    assert_eq!(items[0].value, Value::Complex64(Complex64::new(0.5, -1.5)));

    let zero = Signal {
        amplitude: Complex64::new(0.0, 0.0),
    };
    // zero complex is empty, so the whole struct collapses
    let items = notation(&zero, Mode::SkipEmpty, ".").unwrap();
    assert!(items.is_empty());
}

#[test]
fn test_notation_exports_through_serde_json() {
    let items = notation(&freighter(), Mode::SkipEmpty, ".").unwrap();
    let json = serde_json::to_string(&items).unwrap();
    assert!(json.contains(r#""key":"Ship.name","value":"Hauler""#));
}
