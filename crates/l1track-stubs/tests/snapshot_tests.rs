//! Snapshot tests for stub errors and the raw stub wire format using insta.

use l1track_bend_encoding::BendEncoding;
use l1track_geometry::ModuleId;
use l1track_stubs::{HoughBinRange, RawStub, Stub};
use l1track_test_helpers::prelude::*;

fn error_message(raw: &RawStub) -> String {
    let table = module_table();
    match Stub::from_catalog(raw, 0, &table, &settings(), &BendEncoding::default()) {
        Ok(stub) => format!("built stub {:?}", stub.key()),
        Err(e) => e.to_string(),
    }
}

#[test]
fn snapshot_outside_tracker_message() {
    let raw = RawStubBuilder::on(&barrel_module(1)).r(20.0).build();
    insta::assert_snapshot!(
        error_message(&raw),
        @"Configuration error: Stub found outside assumed tracker volume: r=20, z=10"
    );
}

#[test]
fn snapshot_unknown_module_message() {
    let raw = RawStubBuilder::on(&barrel_module(1)).module(ModuleId(999)).build();
    insta::assert_snapshot!(error_message(&raw), @"Geometry error: Detector module not found: 999");
}

#[test]
fn snapshot_missing_table_message() {
    let mut encoding = BendEncoding::default();
    encoding.endcap.remove(&7);
    let module = endcap_module(2, 1, 7);
    let raw = RawStubBuilder::on(&module).build();

    let message = match Stub::new(&raw, 0, &module, &settings(), &encoding) {
        Ok(_) => String::from("built"),
        Err(e) => e.to_string(),
    };
    insta::assert_snapshot!(message, @"Configuration error: No bend encoding table for endcap ring 7");
}

#[test]
fn snapshot_coincident_sensors_message() {
    let mut module = barrel_module(4);
    module.max_r = module.min_r;
    let raw = RawStubBuilder::on(&module).build();

    let message = match Stub::new(&raw, 0, &module, &settings(), &BendEncoding::default()) {
        Ok(_) => String::from("built"),
        Err(e) => e.to_string(),
    };
    insta::assert_snapshot!(
        message,
        @"Geometry error: Invalid descriptor for module 4000: sensor_spacing must be positive, got 0"
    );
}

#[test]
fn snapshot_invalid_sector_message() {
    let settings = settings();
    let module = barrel_module(2);
    let mut stub = must(Stub::new(
        &RawStubBuilder::on(&module).build(),
        0,
        &module,
        &settings,
        &BendEncoding::default(),
    ));

    let error = must_err(stub.digitize_for_ht(&settings, 32));
    insta::assert_snapshot!(error.to_string(), @"sector value 32 is out of range [0, 31]");
}

#[test]
fn snapshot_raw_stub_json() {
    let raw = RawStubBuilder::on(&barrel_module(3)).key(7).phi(-2.05).bend(2.0).build();
    let json = must(serde_json::to_string(&raw));
    insta::assert_snapshot!(
        json,
        @r#"{"key":7,"module":3000,"phi":-2.05,"r":50.8,"z":10.0,"trigger_bend":2.0,"clusters":[{"key":14,"local_u":480.0,"local_v":16.0},{"key":15,"local_u":480.0,"local_v":16.0}]}"#
    );

    let back: RawStub = must(serde_json::from_str(&json));
    assert_eq!(back, raw);
}

#[test]
fn snapshot_empty_bin_range_json() {
    let range = HoughBinRange::from_q_over_pt(&settings(), 0.5, 0.9);
    insta::assert_snapshot!(must(serde_json::to_string(&range)), @r#"{"min":31,"max":0}"#);
}
