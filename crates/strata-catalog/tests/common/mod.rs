//! Shared fixture: a 3-colors × 2-resolutions tree, in two historical
//! shapes (with and without the color level), plus outlier branches.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use regex::Regex;
use smallvec::smallvec;
use strata_core::codec::LabelSet;
use strata_core::{Convention, Field, Period, Record, Value};
use strata_catalog::{Layout, MemoryStorage, Storage};

pub fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

pub fn dt_h(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
}

pub fn colors() -> LabelSet {
    LabelSet::new(["RED", "GREEN", "BLUE", "gray"])
}

/// Leaf-level convention over the fixture file names.
pub fn file_convention() -> Convention {
    let pattern = Regex::new(
        r"file_(?P<field_i>\d+)_(?P<field_f>[+-]?([0-9]*[.])?[0-9]+)_(?P<field_s>[a-zA-Z0-9.-]+)_(?P<field_date>\d{8})_(?P<field_enum>\w+)_(?P<field_period>\d{8}_\d{8})_(?P<field_date_delta>\d{8}).txt",
    )
    .unwrap();
    let fields = vec![
        Field::integer_padded("field_i", 3),
        Field::float("field_f"),
        Field::string("field_s"),
        Field::datetime("field_date", "%Y%m%d"),
        Field::label("field_enum", colors()),
        Field::span("field_period", "%Y%m%d", "_"),
        Field::date_delta("field_date_delta", "%Y%m%d", Duration::hours(1), false),
    ];
    let template = "file_{field_i}_{field_f}_{field_s}_{field_date}_{field_enum}_{field_period}_{field_date_delta}.txt";
    Convention::with_template(pattern, fields, template).unwrap()
}

/// Directory levels: color, then resolution + index.
pub fn dir_layout() -> Layout {
    Layout::new(vec![color_level(), resolution_level()])
}

pub fn color_level() -> Convention {
    Convention::with_template(
        Regex::new(r"(?P<field_enum>\w+)").unwrap(),
        vec![Field::label("field_enum", colors())],
        "{field_enum}",
    )
    .unwrap()
}

pub fn resolution_level() -> Convention {
    Convention::with_template(
        Regex::new(r"(?P<resolution>\w+)_(?P<field_i>\d{3})").unwrap(),
        vec![Field::string("resolution"), Field::integer_padded("field_i", 3)],
        "{resolution}_{field_i}",
    )
    .unwrap()
}

/// The two historical shapes of the tree, leaf convention included.
pub fn layouts_v2() -> Vec<Layout> {
    vec![
        Layout::new(vec![color_level(), resolution_level(), file_convention()]),
        Layout::new(vec![resolution_level(), file_convention()]),
    ]
}

/// Nine well-formed leaves under the color/resolution shape.
pub fn nine_files() -> Vec<&'static str> {
    vec![
        "root/RED/LR_000/file_000_.25_foo-bar_20230201_RED_20121101_20130705_20010101.txt",
        "root/BLUE/LR_001/file_001_.25_foo-bar_20230202_BLUE_20121101_20130705_20010101.txt",
        "root/GREEN/LR_002/file_002_.25_foo-bar_20230203_GREEN_20121101_20130705_20010101.txt",
        "root/RED/LR_003/file_003_1.75_foo-bar_20230204_RED_20121101_20130705_20010101.txt",
        "root/BLUE/LR_004/file_004_1.75_foo-bar_20230205_BLUE_20121101_20130705_20010101.txt",
        "root/GREEN/LR_005/file_005_1.75_foo-bar_20230206_GREEN_20121101_20130705_20010101.txt",
        "root/RED/HR_006/file_006_5.6_baz_20230207_RED_20221101_20230705_19500101.txt",
        "root/BLUE/HR_007/file_007_5.8_baz_20230208_BLUE_20221101_20230705_19500101.txt",
        "root/GREEN/HR_008/file_008_7.4_baz_20230209_GREEN_20221101_20230705_19500101.txt",
    ]
}

/// Flat-shape leaves, reachable only through the second layout.
pub fn flat_files() -> Vec<&'static str> {
    vec![
        "root/HR_009/file_009_5.6_baz_20230207_RED_20221101_20230705_19500101.txt",
        "root/HR_010/file_010_5.8_baz_20230208_BLUE_20221101_20230705_19500101.txt",
        "root/HR_011/file_011_7.4_baz_20230209_GREEN_20221101_20230705_19500101.txt",
    ]
}

/// Outliers: a leaf no convention recognizes and dead branches.
pub fn outlier_files() -> Vec<&'static str> {
    vec![
        "root/HR_011/KO.txt",
        "root/RED/dead_branch",
        "root/HR_011/dead_branch",
        "root/dead_branch",
    ]
}

/// The mixed tree: both shapes plus outliers, under `root`.
pub fn mixed_storage() -> Arc<dyn Storage> {
    Arc::new(MemoryStorage::with_files(
        nine_files()
            .into_iter()
            .chain(flat_files())
            .chain(outlier_files()),
    ))
}

/// Both shapes, no outliers, under `clean`.
pub fn clean_storage() -> Arc<dyn Storage> {
    Arc::new(MemoryStorage::with_files(
        nine_files()
            .into_iter()
            .chain(flat_files())
            .map(|p| p.replacen("root/", "clean/", 1)),
    ))
}

/// Decoded record of `file_008_7.4_baz_...`.
pub fn record_008() -> Record {
    smallvec![
        Value::Int(8),
        Value::Float(7.4),
        Value::Str("baz".into()),
        Value::Time(dt(2023, 2, 9)),
        Value::Label("GREEN".into()),
        Value::Span(Period::new(dt(2022, 11, 1), dt(2023, 7, 5))),
        Value::Span(Period::half_open(dt(1950, 1, 1), dt_h(1950, 1, 1, 1))),
    ]
}
