//! Parsing and exporting with different tag dictionaries.

use dicomweb_metadata::dictionary::TableEntry;
use dicomweb_metadata::{
    tags, Error, KeyMode, ParserOptions, Scalar, StandardTagDictionary, TableDictionary,
    TagDictionary, ValueRef,
};
use serde_json::json;
use std::sync::Arc;

fn input() -> serde_json::Value {
    json!([{
        "0020000D": { "vr": "UI", "Value": ["1.2.3"] },
        "0020000E": { "vr": "UI", "Value": ["1.2.3.4"] },
        "00080060": { "vr": "CS", "Value": ["CT"] },
        "00280030": { "vr": "DS", "Value": [0.5, 0.5] },
    }])
}

#[test]
fn standard_dictionary_shapes_values() {
    let instance = dicomweb_metadata::parse_instance(&input()).unwrap();
    assert_eq!(
        instance.value_by_keyword("Modality"),
        Some(ValueRef::Single(&Scalar::from("CT")))
    );
    assert_eq!(
        instance.value_by_keyword("PixelSpacing"),
        Some(ValueRef::Multi(&[Scalar::Float(0.5), Scalar::Float(0.5)]))
    );
    assert_eq!(
        serde_json::Value::Object(instance.to_map(KeyMode::Keywords, &[tags::MODALITY])),
        json!({ "Modality": "CT" })
    );
    assert!(matches!(
        instance.resolve_keyword("NoSuchKeyword"),
        Err(Error::UnknownKeyword { .. })
    ));
    assert_eq!(StandardTagDictionary.vr_meaning("PN"), Some("Person Name"));
}

#[test]
fn empty_dictionary_degrades_to_not_found() {
    let parser = ParserOptions::new().dictionary(TableDictionary::new()).build();
    let study = parser.parse_study(&input()).unwrap();
    let instance = &study.series()[0].instances()[0];

    // grouping and shorthands do not need the dictionary
    assert_eq!(study.study_instance_uid(), "1.2.3");
    assert_eq!(instance.modality(), Some("CT"));

    // without multiplicity information every value is a list
    assert_eq!(
        instance.element_value(tags::MODALITY),
        Some(ValueRef::Multi(&[Scalar::from("CT")]))
    );
    assert!(matches!(
        instance.resolve_keyword("Modality"),
        Err(Error::MissingDictionaryData { .. })
    ));
    assert_eq!(instance.value_by_keyword("Modality"), None);
    assert_eq!(instance.resolve_keyword("00080060").unwrap(), tags::MODALITY);

    // keyword exports fall back to tags
    assert_eq!(
        serde_json::Value::Object(instance.to_map(KeyMode::Keywords, &[tags::MODALITY])),
        json!({ "00080060": ["CT"] })
    );
}

#[test]
fn table_dictionary_can_be_shared() {
    let mut table = TableDictionary::new();
    table.insert(
        tags::MODALITY,
        TableEntry {
            name: "Modality".to_string(),
            keyword: "Modality".to_string(),
            value_representation: "CS".to_string(),
            value_multiplicity: Some("1".to_string()),
            description: String::new(),
        },
    );
    let dict = Arc::new(table);
    let parser = ParserOptions::new().dictionary(Arc::clone(&dict)).build();

    let instances = parser.parse_instances(&input()).unwrap();
    assert_eq!(
        instances[0].value_by_keyword("Modality"),
        Some(ValueRef::Single(&Scalar::from("CT")))
    );
    assert_eq!(instances[0].value_by_keyword("PixelSpacing"), None);
    assert_eq!(dict.tag_name(tags::MODALITY).as_deref(), Some("Modality"));
}
