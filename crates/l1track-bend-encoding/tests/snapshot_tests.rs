//! Snapshot tests for bend encoding tables using insta.

use l1track_bend_encoding::{BendEncoding, BendWindow};

fn codes(window: &BendWindow) -> String {
    let top = (window.window * 2.0) as i32 + 1;
    (0..=top)
        .map(|h| {
            let bend = h as f32 / 2.0;
            let d = window.degrade(bend);
            if d.out_of_window {
                format!("{bend}:x")
            } else {
                format!("{bend}:{}/{}", d.bend, d.merged)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn snapshot_barrel_layer_3_codes() -> Result<(), Box<dyn std::error::Error>> {
    let enc = BendEncoding::default();
    let w = enc
        .barrel
        .get(&3)
        .ok_or("default encoding has no barrel layer 3")?;
    insta::assert_snapshot!(codes(w), @"0:0/1 0.5:0.5/1 1:1/1 1.5:1.5/1 2:2/1 2.5:2.75/2 3:2.75/2 3.5:3.5/1 4:x");
    Ok(())
}

#[test]
fn snapshot_endcap_ring_1_codes() -> Result<(), Box<dyn std::error::Error>> {
    let enc = BendEncoding::default();
    let w = enc
        .endcap
        .get(&1)
        .ok_or("default encoding has no endcap ring 1")?;
    insta::assert_snapshot!(codes(w), @"0:0/1 0.5:0.5/1 1:1/1 1.5:1.75/2 2:1.75/2 2.5:x");
    Ok(())
}

#[test]
fn snapshot_invalid_window_message() {
    let yaml = "barrel:\n  2:\n    window: 2.0\n    fine_limit: 3.0\n";
    match BendEncoding::from_yaml_str(yaml) {
        Err(e) => insta::assert_snapshot!(
            e.to_string(),
            @"Configuration error: Invalid setting 'barrel.2.fine_limit': must lie in [0, 2], got 3"
        ),
        Ok(enc) => panic!("expected an error, got {enc:?}"),
    }
}
