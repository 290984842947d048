use bevy::input::mouse::MouseScrollUnit;
use drape::{ContentBounds, DeviceClass, Rect, SlideSpec};

pub const SLIDE_TITLES: [&str; 5] = [
    "Salt flats at dawn",
    "Harbour fog",
    "Cedar ridge",
    "Dune sea",
    "Glacier tongue",
];

/// Pixels scrolled per wheel notch when the platform reports lines.
pub const LINE_HEIGHT_PX: f32 = 100.0;

/// Wheel delta in page pixels, positive when scrolling down.
pub fn wheel_delta_px(unit: MouseScrollUnit, y: f32) -> f32 {
    match unit {
        MouseScrollUnit::Line => -y * LINE_HEIGHT_PX,
        MouseScrollUnit::Pixel => -y,
    }
}

pub struct ColumnLayout {
    pub rects: Vec<Rect>,
    pub content: ContentBounds,
}

/// Slides stacked in one centred column, the first one centred in the viewport.
pub fn column_layout(width: f32, height: f32, count: usize) -> ColumnLayout {
    let slide_width = match DeviceClass::from_width(width) {
        DeviceClass::Mobile => width * 0.8,
        DeviceClass::Tablet => width * 0.55,
        DeviceClass::Desktop => (width * 0.38).min(720.0),
    };
    let slide_height = (slide_width * 0.66).round();
    let gap = (height * 0.12).round();
    let left = (width - slide_width) / 2.0;
    let first_top = (height - slide_height) / 2.0;

    let rects = (0..count)
        .map(|i| {
            Rect::new(
                left,
                first_top + i as f32 * (slide_height + gap),
                slide_width,
                slide_height,
            )
        })
        .collect();

    ColumnLayout {
        rects,
        content: ContentBounds {
            wrap_top: 0.0,
            wrap_height: height,
            margin_bottom: gap,
        },
    }
}

pub fn slide_specs(column: &ColumnLayout) -> Vec<SlideSpec> {
    column
        .rects
        .iter()
        .zip(SLIDE_TITLES.iter().cycle())
        .map(|(rect, title)| SlideSpec {
            rect: *rect,
            title: title.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(MouseScrollUnit::Line, 1.0, -100.0)]
    #[case(MouseScrollUnit::Line, -2.0, 200.0)]
    #[case(MouseScrollUnit::Pixel, -35.0, 35.0)]
    #[case(MouseScrollUnit::Pixel, 0.0, 0.0)]
    fn test_wheel_delta_px(#[case] unit: MouseScrollUnit, #[case] y: f32, #[case] expected: f32) {
        assert_eq!(wheel_delta_px(unit, y), expected);
    }

    #[rstest]
    #[case(1500.0, 900.0)]
    #[case(900.0, 1200.0)]
    #[case(390.0, 844.0)]
    fn test_first_slide_is_centred(#[case] width: f32, #[case] height: f32) {
        let column = column_layout(width, height, 5);
        let first = column.rects[0];
        assert!((first.left + first.width / 2.0 - width / 2.0).abs() < 1e-3);
        assert!((first.top + first.height / 2.0 - height / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_slides_do_not_overlap() {
        let column = column_layout(1500.0, 900.0, 5);
        for pair in column.rects.windows(2) {
            assert!(pair[1].top >= pair[0].bottom());
            assert_eq!(pair[1].top - pair[0].bottom(), column.content.margin_bottom);
        }
    }

    #[test]
    fn test_phone_slides_are_wide() {
        let column = column_layout(390.0, 844.0, 3);
        assert_eq!(column.rects[0].width, 312.0);
    }

    #[test]
    fn test_titles_cycle_past_the_list() {
        let column = column_layout(1500.0, 900.0, 7);
        let specs = slide_specs(&column);
        assert_eq!(specs.len(), 7);
        assert_eq!(specs[5].title, SLIDE_TITLES[0]);
    }
}
