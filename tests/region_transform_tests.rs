use approx::assert_relative_eq;
use proptest::prelude::*;
use tsgraph::core::{DataRect, DeviceRect, RegionTransform};

fn plot_transform(reversed: bool) -> RegionTransform {
    let data = DataRect::new(631_152_000.0, 820_454_400.0, -250.0, 4_800.0);
    let data = if reversed { data.reversed_y() } else { data };
    RegionTransform::new(DeviceRect::new(74.0, 31.0, 912.0, 547.0), data)
        .expect("valid transform")
}

#[test]
fn data_corners_map_to_device_corners() {
    let t = plot_transform(false);
    let device = t.device();
    let data = t.data();
    assert_relative_eq!(t.x_to_px(data.x_left), device.left);
    assert_relative_eq!(t.x_to_px(data.x_right), device.right());
    assert_relative_eq!(t.y_to_px(data.y_bottom), device.bottom());
    assert_relative_eq!(t.y_to_px(data.y_top), device.top);
}

#[test]
fn reversing_swaps_vertical_mapping_only() {
    let normal = plot_transform(false);
    let reversed = plot_transform(true);
    assert_relative_eq!(normal.y_to_px(-250.0), reversed.y_to_px(4_800.0));
    assert_relative_eq!(normal.x_to_px(700_000_000.0), reversed.x_to_px(700_000_000.0));
}

proptest! {
    #[test]
    fn round_trip_reproduces_data_coordinates(
        x_frac in 0.0_f64..1.0,
        y_frac in 0.0_f64..1.0,
        reversed in proptest::bool::ANY,
    ) {
        let t = plot_transform(reversed);
        let data = t.data();
        let x = data.x_left + x_frac * (data.x_right - data.x_left);
        let y = data.y_bottom + y_frac * (data.y_top - data.y_bottom);

        let (px, py) = t.to_px(x, y);
        let back_x = t.px_to_x(px);
        let back_y = t.px_to_y(py);

        prop_assert!((back_x - x).abs() <= 1.0e-6 * x.abs().max(1.0));
        prop_assert!((back_y - y).abs() <= 1.0e-6 * y.abs().max(1.0));
    }
}
