//! Property-based tests for stub construction, binning and digitization.

use l1track_bend_encoding::BendEncoding;
use l1track_config::{FirmwareType, Settings};
use l1track_geometry::DetectorLayer;
use l1track_stubs::frontend::{self, FrontendInputs};
use l1track_stubs::{HoughBinRange, Stub};
use l1track_test_helpers::prelude::*;
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
struct StubSpec {
    layer: u32,
    phi: f32,
    z: f32,
    bend: f32,
}

fn stub_spec() -> impl Strategy<Value = StubSpec> {
    (1u32..=6, -3.1f32..3.1, -100.0f32..100.0, -16i32..=16).prop_map(|(layer, phi, z, h)| StubSpec {
        layer,
        phi,
        z,
        bend: h as f32 / 2.0,
    })
}

fn firmware_type() -> impl Strategy<Value = FirmwareType> {
    prop_oneof![
        Just(FirmwareType::Systolic),
        Just(FirmwareType::DaisyChain),
        Just(FirmwareType::TwoCBin),
    ]
}

fn build(spec: StubSpec, settings: &Settings) -> Stub {
    let module = barrel_module(spec.layer);
    let raw = RawStubBuilder::on(&module)
        .phi(spec.phi)
        .z(spec.z)
        .bend(spec.bend)
        .build();
    must(Stub::new(&raw, 0, &module, settings, &BendEncoding::default()))
}

fn bins(range: HoughBinRange) -> (u32, u32) {
    (range.min_bin(), range.max_bin())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn reduced_layer_id_is_total(layer in any::<DetectorLayer>()) {
        let reduced = layer.reduced_id();
        prop_assert!(reduced.is_ok(), "{layer:?}: {reduced:?}");
        let reduced = reduced.unwrap_or_default();
        prop_assert!((1..=7).contains(&reduced));
    }

    #[test]
    fn bin_range_is_clamped_and_swapped(
        q_min in -2.0f32..2.0,
        q_max in -2.0f32..2.0,
        min_pt in 1.5f32..10.0,
        nbins in 1u32..=64,
    ) {
        let settings = settings_with(|s| {
            s.hough.min_pt = min_pt;
            s.hough.nbins_pt = nbins;
        });
        let range = HoughBinRange::from_q_over_pt(&settings, q_min, q_max);
        assert_bin_range_valid!(bins(range), nbins);
        prop_assert_eq!(range.is_empty(), range.bins().count() == 0);
    }

    #[test]
    fn bin_range_grows_with_resolution(
        k in 0.01f32..0.5,
        h in -16i32..=16,
        res in 0.0f32..3.0,
        extra in 0.0f32..3.0,
    ) {
        let settings = settings();
        let bend = h as f32 / 2.0;
        let narrow = HoughBinRange::compute(&settings, k, bend, res);
        let wide = HoughBinRange::compute(&settings, k, bend, res + extra);
        if !narrow.is_empty() {
            prop_assert!(!wide.is_empty());
            prop_assert!(wide.min_bin() <= narrow.min_bin());
            prop_assert!(wide.max_bin() >= narrow.max_bin());
        }
    }

    #[test]
    fn raising_min_pt_never_admits_more_stubs(
        eta in -3.0f32..3.0,
        h in -16i32..=16,
        k in 0.01f32..0.5,
        low_pt in 1.5f32..5.0,
        step in 0.0f32..5.0,
        out_of_window in any::<bool>(),
    ) {
        let bend = h as f32 / 2.0;
        let inputs = FrontendInputs {
            eta,
            bend_in_frontend: bend,
            bend_res_in_frontend: 1.25,
            bend,
            bend_res: 1.25,
            q_over_pt_over_bend: k,
            bend_out_of_window: out_of_window,
        };
        let loose = frontend::evaluate(&settings_with(|s| s.hough.min_pt = low_pt), &inputs);
        let tight = frontend::evaluate(&settings_with(|s| s.hough.min_pt = low_pt + step), &inputs);
        prop_assert!(!tight.pass || loose.pass);
        prop_assert!(!(loose.pass && loose.failed_window_only));
    }

    #[test]
    fn constructed_stub_invariants(spec in stub_spec()) {
        let settings = settings();
        let stub = build(spec, &settings);
        assert_bin_range_valid!(bins(stub.bin_range()), settings.hough.nbins_pt);
        if stub.frontend_pass() {
            prop_assert!(stub.eta().abs() <= settings.stub_cuts.max_stub_eta);
        }
        prop_assert!(stub.num_merged_bend() >= 1);
        prop_assert!(stub.bend() * stub.bend_in_frontend() >= 0.0);
        prop_assert!(stub.iphi() < stub.module().n_strips);
    }

    #[test]
    fn gp_digitization_is_idempotent(spec in stub_spec(), sector in 0u32..32) {
        let settings = settings();
        let mut stub = build(spec, &settings);
        must(stub.digitize_for_gp(&settings, sector));
        let once = stub.clone();
        must(stub.digitize_for_gp(&settings, sector));
        prop_assert_eq!(stub, once);
    }

    #[test]
    fn ht_digitization_then_reset_is_identity(
        spec in stub_spec(),
        sector in 0u32..32,
        firmware in firmware_type(),
    ) {
        let settings = settings_with(|s| s.hough.firmware_type = firmware);
        let original = build(spec, &settings);
        let mut stub = original.clone();

        must(stub.digitize_for_ht(&settings, sector));
        prop_assert!(stub.digitized_for_gp() && stub.digitized_for_ht());
        assert_bin_range_valid!(bins(stub.bin_range()), settings.hough.nbins_pt);
        prop_assert_eq!(stub.frontend_pass(), original.frontend_pass());

        stub.reset_digitization();
        prop_assert_eq!(stub, original);
    }

    #[test]
    fn sector_hopping_matches_direct_digitization(
        spec in stub_spec(),
        first in 0u32..32,
        second in 0u32..32,
    ) {
        let settings = settings();
        let mut hopped = build(spec, &settings);
        let mut direct = hopped.clone();

        must(hopped.digitize_for_ht(&settings, first));
        must(hopped.digitize_for_ht(&settings, second));
        must(direct.digitize_for_ht(&settings, second));

        prop_assert_eq!(hopped.kinematics(), direct.kinematics());
        prop_assert_eq!(hopped.ht_digits(), direct.ht_digits());
    }
}
