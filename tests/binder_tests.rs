// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for binding configuration onto typed values.

use layercfg::binder::DynBind;
use layercfg::prelude::*;
use std::collections::{BTreeMap, HashMap};

fn root(pairs: &[(&str, &str)]) -> ConfigRoot {
    ConfigBuilder::new()
        .with_in_memory(pairs.iter().copied())
        .build()
        .unwrap()
}

#[derive(Debug, Default)]
struct Scalars {
    integer: i32,
    boolean: bool,
    ratio: f64,
    letter: char,
    maybe: Option<u8>,
}

bind_object!(Scalars {
    "Integer" => integer,
    "Boolean" => boolean,
    "Ratio" => ratio,
    "Letter" => letter,
    "Maybe" => maybe,
});

#[derive(Debug, Default)]
struct Inner {
    integer: i32,
}

bind_object!(Inner { "Integer" => integer });

#[derive(Debug, Default)]
struct Outer {
    nested: Inner,
    optional: Option<Inner>,
    array: Box<[i32]>,
    list: Vec<Inner>,
    map: HashMap<String, Inner>,
    ordered: BTreeMap<String, String>,
}

bind_object!(Outer {
    "Nested" => nested,
    "Optional" => optional,
    "Array" => array,
    "List" => list,
    "Map" => map,
    "Ordered" => ordered,
});

trait Shape: DynBind + Send {
    fn area(&self) -> f64;
}

#[derive(Debug, Default)]
struct Square {
    side: f64,
}

impl Shape for Square {
    fn area(&self) -> f64 {
        self.side * self.side
    }
}

bind_object!(Square { "Side" => side });
bind_abstract!(dyn Shape);

#[derive(Default)]
struct Drawing {
    shape: Option<Box<dyn Shape>>,
}

bind_object!(Drawing { "Shape" => shape });

#[test]
fn test_binding_scalar_round_trip() {
    let root = root(&[("Integer", "-2"), ("Boolean", "TRUe")]);
    let mut scalars = Scalars::default();

    root.bind(&mut scalars).unwrap();
    assert_eq!(scalars.integer, -2);
    assert!(scalars.boolean);
}

#[test]
fn test_binding_every_scalar_member() {
    let root = root(&[
        ("integer", "0x10"),
        ("ratio", " 0.25 "),
        ("letter", "z"),
        ("maybe", "7"),
    ]);

    let scalars: Scalars = root.get_as().unwrap().unwrap();
    assert_eq!(scalars.integer, 16);
    assert_eq!(scalars.ratio, 0.25);
    assert_eq!(scalars.letter, 'z');
    assert_eq!(scalars.maybe, Some(7));
}

#[test]
fn test_binding_conversion_failure_is_reported() {
    let root = root(&[("Integer", "twelve")]);
    let mut scalars = Scalars::default();

    match root.bind(&mut scalars) {
        Err(ConfigError::TypeConversionError { key, value, .. }) => {
            assert_eq!(key, "Integer");
            assert_eq!(value, "twelve");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_binding_nested_object() {
    let root = root(&[("Nested:Integer", "11")]);
    let mut outer = Outer::default();

    root.bind(&mut outer).unwrap();
    assert_eq!(outer.nested.integer, 11);
    assert!(outer.optional.is_none());
}

#[test]
fn test_binding_activates_missing_optional_object() {
    let root = root(&[("Optional:Integer", "3")]);
    let outer: Outer = root.get_as().unwrap().unwrap();

    assert_eq!(outer.optional.map(|inner| inner.integer), Some(3));
}

#[test]
fn test_binding_array_growth() {
    let root = root(&[("Array:0", "1"), ("Array:1", "2"), ("Array:2", "3")]);
    let mut outer = Outer::default();
    assert!(outer.array.is_empty());

    root.bind(&mut outer).unwrap();
    assert_eq!(&*outer.array, &[1, 2, 3]);

    root.bind(&mut outer).unwrap();
    assert_eq!(outer.array.len(), 6);
}

#[test]
fn test_binding_collection_skips_bad_elements() {
    let root = root(&[
        ("List:0:Integer", "1"),
        ("List:1:Integer", "oops"),
        ("List:2:Integer", "3"),
    ]);
    let outer: Outer = root.get_as().unwrap().unwrap();

    let values: Vec<i32> = outer.list.iter().map(|inner| inner.integer).collect();
    assert_eq!(values, vec![1, 3]);
}

#[test]
fn test_binding_dictionaries() {
    let root = root(&[
        ("Map:first:Integer", "1"),
        ("Map:Second:Integer", "2"),
        ("Ordered:b", "B"),
        ("Ordered:a", "A"),
    ]);
    let outer: Outer = root.get_as().unwrap().unwrap();

    assert_eq!(outer.map["first"].integer, 1);
    assert_eq!(outer.map["Second"].integer, 2);
    assert_eq!(
        outer.ordered.into_iter().collect::<Vec<_>>(),
        vec![
            ("a".to_string(), "A".to_string()),
            ("b".to_string(), "B".to_string())
        ]
    );
}

#[test]
fn test_binding_interface_property_fails() {
    let root = root(&[("Shape:Side", "2")]);
    let mut drawing = Drawing::default();

    let err = root.bind(&mut drawing).unwrap_err();
    assert!(matches!(err, ConfigError::Activation { .. }));
}

#[test]
fn test_binding_into_existing_trait_object() {
    let root = root(&[("Shape:Side", "3")]);
    let mut drawing = Drawing {
        shape: Some(Box::new(Square::default())),
    };

    root.bind(&mut drawing).unwrap();
    assert_eq!(drawing.shape.map(|s| s.area()), Some(9.0));
}

#[test]
fn test_empty_section_leaves_target_untouched() {
    let root = root(&[("Other", "x")]);
    let mut outer = Outer {
        nested: Inner { integer: 5 },
        ..Outer::default()
    };

    root.section("missing").bind(&mut outer).unwrap();
    assert_eq!(outer.nested.integer, 5);
    assert!(root.section("missing").get_as::<Outer>().unwrap().is_none());
}

#[test]
fn test_unknown_configuration_option() {
    let root = root(&[("Integer", "1"), ("Extra", "x")]);
    let options = BinderOptions::default().with_error_on_unknown_configuration(true);
    let mut inner = Inner::default();

    assert!(matches!(
        root.bind_with(&mut inner, &options),
        Err(ConfigError::UnknownConfiguration { .. })
    ));
    assert!(root.bind(&mut inner).is_ok());
    assert_eq!(inner.integer, 1);
}

#[test]
fn test_get_value_helpers() {
    let root = root(&[("Port", " 8080 "), ("Bad", "x"), ("Addr", "10.0.0.1:53")]);

    assert_eq!(root.get_value::<u16>("port").unwrap(), Some(8080));
    assert_eq!(root.get_value::<u16>("missing").unwrap(), None);
    assert_eq!(root.get_value_or("missing", 1u16).unwrap(), 1);
    assert!(root.get_value_or("bad", 1u16).is_err());
    assert_eq!(
        root.get_value::<std::net::SocketAddr>("addr").unwrap().map(|a| a.port()),
        Some(53)
    );
    assert!(root.get_value::<Inner>("port").is_err());
}

#[test]
fn test_get_value_optional_empty_string() {
    let root = root(&[("Name", ""), ("Port", "")]);

    assert_eq!(
        root.get_value::<Option<String>>("name").unwrap(),
        Some(Some(String::new()))
    );
    assert_eq!(root.get_value::<Option<u16>>("port").unwrap(), Some(None));
    assert!(root.get_value::<u16>("port").is_err());
}
