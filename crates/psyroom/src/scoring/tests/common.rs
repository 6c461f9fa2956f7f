use crate::scoring::{
    ColorOption, ColorPart, ColorPoints, ColorTypeSpec, DominanceRules, FactorGroup,
    FactorStatement, ForcedPairSpec, Instrument, LevelScheme, PercentThresholds, ScaleThresholds,
    SplitPointSpec, SplitQuestion, Tag, TagSpec, TestDefinition, TestId,
};
use crate::scoring::ColorCategory::{self, Blue, Green, Red};

pub(super) fn tags(values: &[&str]) -> Vec<Tag> {
    values.iter().copied().map(Tag::from).collect()
}

fn tag_specs(values: &[&str]) -> Vec<TagSpec> {
    values
        .iter()
        .map(|value| TagSpec {
            tag: Tag::from(*value),
            label: value.to_uppercase(),
        })
        .collect()
}

/// Five-tag forced-pair spec with the 70/30 thresholds used throughout the tests.
pub(super) fn forced_pair_spec() -> ForcedPairSpec {
    ForcedPairSpec {
        tags: tag_specs(&["d", "i", "s", "c", "e"]),
        thresholds: PercentThresholds {
            strong_at_or_above: 70,
            weak_at_or_below: 30,
        },
        questions: Vec::new(),
    }
}

pub(super) fn forced_pair_definition() -> TestDefinition {
    TestDefinition {
        id: TestId::from("fp"),
        title: "Forced pair".to_string(),
        description: String::new(),
        instrument: Instrument::ForcedPair(forced_pair_spec()),
    }
}

fn split_question(left: &str, right: &str, max_points: Option<u32>) -> SplitQuestion {
    SplitQuestion {
        left: FactorStatement {
            factor: Tag::from(left),
            text: String::new(),
        },
        right: FactorStatement {
            factor: Tag::from(right),
            text: String::new(),
        },
        max_points,
    }
}

/// Three factors; `pay` appears in two questions, the others in one or two.
pub(super) fn split_point_spec() -> SplitPointSpec {
    SplitPointSpec {
        factors: tag_specs(&["pay", "team", "growth"]),
        questions: vec![
            split_question("pay", "team", None),
            split_question("pay", "growth", None),
            split_question("team", "growth", Some(10)),
        ],
        default_max_points: 5,
        levels: LevelScheme::Scale(ScaleThresholds {
            scale_max: 35,
            low_max: 14,
            mid_max: 24,
        }),
        groups: vec![
            FactorGroup {
                key: "hygiene".to_string(),
                label: "Hygiene".to_string(),
                members: tags(&["pay"]),
            },
            FactorGroup {
                key: "motivators".to_string(),
                label: "Motivators".to_string(),
                members: tags(&["team", "growth"]),
            },
        ],
    }
}

pub(super) fn split_point_definition() -> TestDefinition {
    TestDefinition {
        id: TestId::from("sp"),
        title: "Split points".to_string(),
        description: String::new(),
        instrument: Instrument::SplitPoint(split_point_spec()),
    }
}

fn options(prefix: &str, colors: &[ColorCategory]) -> Vec<ColorOption> {
    colors
        .iter()
        .enumerate()
        .map(|(index, color)| ColorOption {
            id: format!("{prefix}{}", index + 1),
            color: *color,
            text: String::new(),
        })
        .collect()
}

fn color_part(prefix: &str) -> ColorPart {
    ColorPart {
        prompt: String::new(),
        choice: options(&format!("{prefix}c"), &[Red, Green, Blue]),
        ranking: options(&format!("{prefix}r"), &[Red, Green, Blue]),
        selection: options(
            &format!("{prefix}s"),
            &[Red, Red, Red, Green, Green, Green, Blue, Blue, Blue],
        ),
    }
}

pub(super) fn color_spec() -> ColorTypeSpec {
    ColorTypeSpec {
        part_a: color_part("a"),
        part_b: color_part("b"),
        points: ColorPoints::default(),
        thresholds: PercentThresholds {
            strong_at_or_above: 40,
            weak_at_or_below: 25,
        },
        dominance: DominanceRules::default(),
    }
}

pub(super) fn color_definition() -> TestDefinition {
    TestDefinition {
        id: TestId::from("ct"),
        title: "Color type".to_string(),
        description: String::new(),
        instrument: Instrument::ColorType(color_spec()),
    }
}
