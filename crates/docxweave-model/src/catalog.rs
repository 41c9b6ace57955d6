//! Built-in style catalog
//!
//! Every new document starts with a copy of this catalog so that tables can
//! reference names like `"LightList-Accent4"` or `"TableGrid"` without
//! registering anything first. The catalog is built once per process and is
//! never mutated; documents clone it.
//!
//! Table style families follow Word's classic gallery. Each family exists
//! unaccented and in `Accent1`..`Accent6` variants, colored from the default
//! Office theme.

use once_cell::sync::Lazy;

use crate::block::{Justification, Underline, HYPERLINK_STYLE};
use crate::style::{
    Border, Formatting, StyleDefinition, StyleKind, StyleRegistry, TableBorders, TableRegion,
};

/// Base table style every built-in table style derives from
pub const TABLE_NORMAL: &str = "TableNormal";

/// Base paragraph style
pub const NORMAL: &str = "Normal";

/// Default character style
pub const DEFAULT_PARAGRAPH_FONT: &str = "DefaultParagraphFont";

/// Title paragraph style (heading level 0)
pub const TITLE: &str = "Title";

/// Default Office theme accents, `Accent1`..`Accent6`
const ACCENTS: [&str; 6] = ["4F81BD", "C0504D", "9BBB59", "8064A2", "4BACC6", "F79646"];

/// Text color used by unaccented variants
const DARK: &str = "000000";

const WHITE: &str = "FFFFFF";

/// Table style families, in catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    LightShading,
    LightList,
    LightGrid,
    MediumShading,
    MediumShading2,
    MediumList1,
    MediumList2,
    MediumGrid1,
    MediumGrid2,
    MediumGrid3,
    DarkList,
    ColorfulShading,
    ColorfulList,
    ColorfulGrid,
}

const FAMILIES: [Family; 14] = [
    Family::LightShading,
    Family::LightList,
    Family::LightGrid,
    Family::MediumShading,
    Family::MediumShading2,
    Family::MediumList1,
    Family::MediumList2,
    Family::MediumGrid1,
    Family::MediumGrid2,
    Family::MediumGrid3,
    Family::DarkList,
    Family::ColorfulShading,
    Family::ColorfulList,
    Family::ColorfulGrid,
];

impl Family {
    fn id(self) -> &'static str {
        match self {
            Family::LightShading => "LightShading",
            Family::LightList => "LightList",
            Family::LightGrid => "LightGrid",
            Family::MediumShading => "MediumShading",
            Family::MediumShading2 => "MediumShading2",
            Family::MediumList1 => "MediumList1",
            Family::MediumList2 => "MediumList2",
            Family::MediumGrid1 => "MediumGrid1",
            Family::MediumGrid2 => "MediumGrid2",
            Family::MediumGrid3 => "MediumGrid3",
            Family::DarkList => "DarkList",
            Family::ColorfulShading => "ColorfulShading",
            Family::ColorfulList => "ColorfulList",
            Family::ColorfulGrid => "ColorfulGrid",
        }
    }

    fn ui_priority(self) -> u32 {
        60 + FAMILIES.iter().position(|f| *f == self).unwrap_or(0) as u32
    }

    fn build(self, name: String, accent: &str) -> StyleDefinition {
        let bold = || Formatting::new().bold(true);
        let band = TableRegion::Band1Horizontal;
        let band_v = TableRegion::Band1Vertical;

        let style = StyleDefinition::table(name)
            .based_on(TABLE_NORMAL)
            .ui_priority(self.ui_priority());

        match self {
            Family::LightShading => style
                .with_formatting(banded(Formatting::new().color(shade(accent, 0.25)).borders(
                    TableBorders {
                        top: Some(Border::single(8, accent)),
                        bottom: Some(Border::single(8, accent)),
                        ..Default::default()
                    },
                )))
                .with_region(
                    TableRegion::FirstRow,
                    bold().borders(TableBorders {
                        bottom: Some(Border::single(8, accent)),
                        ..Default::default()
                    }),
                )
                .with_region(
                    TableRegion::LastRow,
                    bold().borders(TableBorders {
                        top: Some(Border::single(8, accent)),
                        ..Default::default()
                    }),
                )
                .with_region(TableRegion::FirstColumn, bold())
                .with_region(TableRegion::LastColumn, bold())
                .with_region(band_v, Formatting::new().shading(tint(accent, 0.75)))
                .with_region(band, Formatting::new().shading(tint(accent, 0.75))),

            Family::LightList => style
                .with_formatting(banded(
                    Formatting::new().borders(TableBorders::outer(Border::single(8, accent))),
                ))
                .with_region(
                    TableRegion::FirstRow,
                    bold().color(WHITE).shading(accent),
                )
                .with_region(
                    TableRegion::LastRow,
                    bold().borders(TableBorders {
                        top: Some(Border::double(6, accent)),
                        ..Default::default()
                    }),
                )
                .with_region(TableRegion::FirstColumn, bold())
                .with_region(TableRegion::LastColumn, bold())
                .with_region(
                    band_v,
                    Formatting::new().borders(TableBorders::outer(Border::single(8, accent))),
                )
                .with_region(
                    band,
                    Formatting::new().borders(TableBorders::outer(Border::single(8, accent))),
                ),

            Family::LightGrid => style
                .with_formatting(banded(
                    Formatting::new().borders(TableBorders::all(Border::single(8, accent))),
                ))
                .with_region(
                    TableRegion::FirstRow,
                    bold().borders(TableBorders {
                        bottom: Some(Border::single(18, accent)),
                        ..Default::default()
                    }),
                )
                .with_region(
                    TableRegion::LastRow,
                    bold().borders(TableBorders {
                        top: Some(Border::double(6, accent)),
                        ..Default::default()
                    }),
                )
                .with_region(TableRegion::FirstColumn, bold())
                .with_region(TableRegion::LastColumn, bold())
                .with_region(band_v, Formatting::new().shading(tint(accent, 0.75)))
                .with_region(band, Formatting::new().shading(tint(accent, 0.75))),

            Family::MediumShading => style
                .with_formatting(banded(Formatting::new().borders(TableBorders {
                    inside_h: Some(Border::single(8, tint(accent, 0.25))),
                    ..TableBorders::outer(Border::single(8, tint(accent, 0.25)))
                })))
                .with_region(
                    TableRegion::FirstRow,
                    bold().color(WHITE).shading(accent),
                )
                .with_region(
                    TableRegion::LastRow,
                    bold().borders(TableBorders {
                        top: Some(Border::double(6, tint(accent, 0.25))),
                        ..Default::default()
                    }),
                )
                .with_region(TableRegion::FirstColumn, bold())
                .with_region(TableRegion::LastColumn, bold())
                .with_region(band_v, Formatting::new().shading(tint(accent, 0.75)))
                .with_region(band, Formatting::new().shading(tint(accent, 0.75))),

            Family::MediumShading2 => style
                .with_formatting(banded(Formatting::new().borders(TableBorders {
                    top: Some(Border::single(18, DARK)),
                    bottom: Some(Border::single(18, DARK)),
                    ..Default::default()
                })))
                .with_region(
                    TableRegion::FirstRow,
                    bold().color(WHITE).shading(accent),
                )
                .with_region(
                    TableRegion::LastRow,
                    Formatting::new().shading("F2F2F2"),
                )
                .with_region(TableRegion::FirstColumn, bold().color(WHITE).shading(accent))
                .with_region(TableRegion::LastColumn, bold().color(WHITE).shading(accent))
                .with_region(band_v, Formatting::new().shading("D8D8D8"))
                .with_region(band, Formatting::new().shading("D8D8D8")),

            Family::MediumList1 => style
                .with_formatting(banded(Formatting::new().color(DARK).borders(TableBorders {
                    top: Some(Border::single(8, accent)),
                    bottom: Some(Border::single(8, accent)),
                    ..Default::default()
                })))
                .with_region(
                    TableRegion::FirstRow,
                    bold().borders(TableBorders {
                        bottom: Some(Border::single(8, accent)),
                        ..Default::default()
                    }),
                )
                .with_region(
                    TableRegion::LastRow,
                    bold().color(shade(accent, 0.5)).borders(TableBorders {
                        top: Some(Border::single(8, accent)),
                        ..Default::default()
                    }),
                )
                .with_region(TableRegion::FirstColumn, bold())
                .with_region(TableRegion::LastColumn, bold())
                .with_region(band_v, Formatting::new().shading(tint(accent, 0.75)))
                .with_region(band, Formatting::new().shading(tint(accent, 0.75))),

            Family::MediumList2 => style
                .with_formatting(banded(
                    Formatting::new()
                        .color(DARK)
                        .borders(TableBorders::outer(Border::single(8, accent))),
                ))
                .with_region(
                    TableRegion::FirstRow,
                    Formatting::new().size(24).borders(TableBorders {
                        bottom: Some(Border::single(24, accent)),
                        ..Default::default()
                    }),
                )
                .with_region(
                    TableRegion::LastRow,
                    Formatting::new().borders(TableBorders {
                        top: Some(Border::single(8, accent)),
                        ..Default::default()
                    }),
                )
                .with_region(TableRegion::FirstColumn, Formatting::new().shading(WHITE))
                .with_region(TableRegion::LastColumn, Formatting::new().shading(WHITE))
                .with_region(band_v, Formatting::new().shading(tint(accent, 0.75)))
                .with_region(band, Formatting::new().shading(tint(accent, 0.75))),

            Family::MediumGrid1 => style
                .with_formatting(banded(
                    Formatting::new()
                        .shading(tint(accent, 0.75))
                        .borders(TableBorders::all(Border::single(8, tint(accent, 0.25)))),
                ))
                .with_region(TableRegion::FirstRow, bold())
                .with_region(
                    TableRegion::LastRow,
                    bold().borders(TableBorders {
                        top: Some(Border::single(18, tint(accent, 0.25))),
                        ..Default::default()
                    }),
                )
                .with_region(TableRegion::FirstColumn, bold())
                .with_region(TableRegion::LastColumn, bold())
                .with_region(band_v, Formatting::new().shading(tint(accent, 0.5)))
                .with_region(band, Formatting::new().shading(tint(accent, 0.5))),

            Family::MediumGrid2 => style
                .with_formatting(banded(
                    Formatting::new()
                        .color(DARK)
                        .shading(tint(accent, 0.8))
                        .borders(TableBorders::all(Border::single(8, accent))),
                ))
                .with_region(
                    TableRegion::FirstRow,
                    bold().shading(tint(accent, 0.9)),
                )
                .with_region(
                    TableRegion::LastRow,
                    bold().shading(tint(accent, 0.9)),
                )
                .with_region(TableRegion::FirstColumn, bold().shading(tint(accent, 0.6)))
                .with_region(TableRegion::LastColumn, Formatting::new().shading(tint(accent, 0.6)))
                .with_region(band_v, Formatting::new().shading(tint(accent, 0.6)))
                .with_region(band, Formatting::new().shading(tint(accent, 0.6))),

            Family::MediumGrid3 => style
                .with_formatting(banded(
                    Formatting::new()
                        .shading(tint(accent, 0.75))
                        .borders(TableBorders::all(Border::single(8, WHITE))),
                ))
                .with_region(
                    TableRegion::FirstRow,
                    bold().color(WHITE).shading(accent),
                )
                .with_region(
                    TableRegion::LastRow,
                    bold().color(WHITE).shading(accent),
                )
                .with_region(TableRegion::FirstColumn, bold().color(WHITE).shading(accent))
                .with_region(TableRegion::LastColumn, bold().color(WHITE).shading(accent))
                .with_region(band_v, Formatting::new().shading(tint(accent, 0.5)))
                .with_region(band, Formatting::new().shading(tint(accent, 0.5))),

            Family::DarkList => style
                .with_formatting(banded(Formatting::new().color(WHITE).shading(accent)))
                .with_region(
                    TableRegion::FirstRow,
                    bold().borders(TableBorders {
                        bottom: Some(Border::single(18, WHITE)),
                        ..Default::default()
                    }),
                )
                .with_region(
                    TableRegion::LastRow,
                    Formatting::new().shading(shade(accent, 0.5)).borders(TableBorders {
                        top: Some(Border::single(18, WHITE)),
                        ..Default::default()
                    }),
                )
                .with_region(
                    TableRegion::FirstColumn,
                    Formatting::new().shading(shade(accent, 0.25)),
                )
                .with_region(
                    TableRegion::LastColumn,
                    Formatting::new().shading(shade(accent, 0.25)),
                )
                .with_region(band_v, Formatting::new().shading(shade(accent, 0.25)))
                .with_region(band, Formatting::new().shading(shade(accent, 0.25))),

            Family::ColorfulShading => style
                .with_formatting(banded(
                    Formatting::new()
                        .color(DARK)
                        .shading(tint(accent, 0.9))
                        .borders(TableBorders {
                            top: Some(Border::single(24, shade(accent, 0.25))),
                            ..TableBorders::outer(Border::single(4, accent))
                        }),
                ))
                .with_region(
                    TableRegion::FirstRow,
                    bold().borders(TableBorders {
                        bottom: Some(Border::single(24, shade(accent, 0.25))),
                        ..Default::default()
                    }),
                )
                .with_region(
                    TableRegion::LastRow,
                    bold().color(shade(accent, 0.5)).shading(WHITE),
                )
                .with_region(
                    TableRegion::FirstColumn,
                    bold().color(WHITE).shading(shade(accent, 0.25)),
                )
                .with_region(
                    TableRegion::LastColumn,
                    bold().color(WHITE).shading(shade(accent, 0.25)),
                )
                .with_region(band_v, Formatting::new().shading(tint(accent, 0.6)))
                .with_region(band, Formatting::new().shading(tint(accent, 0.75))),

            Family::ColorfulList => style
                .with_formatting(banded(
                    Formatting::new().color(DARK).shading(tint(accent, 0.9)),
                ))
                .with_region(
                    TableRegion::FirstRow,
                    bold().color(WHITE).shading(shade(accent, 0.25)),
                )
                .with_region(
                    TableRegion::LastRow,
                    bold().color(shade(accent, 0.25)).borders(TableBorders {
                        top: Some(Border::single(12, DARK)),
                        ..Default::default()
                    }),
                )
                .with_region(TableRegion::FirstColumn, bold())
                .with_region(TableRegion::LastColumn, bold())
                .with_region(band_v, Formatting::new().shading(tint(accent, 0.75)))
                .with_region(band, Formatting::new().shading(tint(accent, 0.8))),

            Family::ColorfulGrid => style
                .with_formatting(banded(
                    Formatting::new()
                        .color(DARK)
                        .shading(tint(accent, 0.8))
                        .borders(TableBorders {
                            inside_h: Some(Border::single(4, WHITE)),
                            ..Default::default()
                        }),
                ))
                .with_region(
                    TableRegion::FirstRow,
                    bold().shading(tint(accent, 0.6)),
                )
                .with_region(
                    TableRegion::LastRow,
                    bold().color(DARK).shading(tint(accent, 0.6)),
                )
                .with_region(
                    TableRegion::FirstColumn,
                    bold().color(WHITE).shading(shade(accent, 0.25)),
                )
                .with_region(
                    TableRegion::LastColumn,
                    bold().color(WHITE).shading(shade(accent, 0.25)),
                )
                .with_region(band_v, Formatting::new().shading(tint(accent, 0.4)))
                .with_region(band, Formatting::new().shading(tint(accent, 0.4))),
        }
    }
}

/// Whole-table formatting shared by every family: one-row, one-column bands
fn banded(formatting: Formatting) -> Formatting {
    Formatting {
        row_band_size: Some(1),
        col_band_size: Some(1),
        spacing_after: Some(0),
        line_spacing: Some(240),
        ..formatting
    }
}

/// Blend a hex color toward white by `amount` (0.0 = unchanged, 1.0 = white)
fn tint(hex: &str, amount: f32) -> String {
    map_channels(hex, |c| c + (255.0 - c) * amount)
}

/// Blend a hex color toward black by `amount`
fn shade(hex: &str, amount: f32) -> String {
    map_channels(hex, |c| c * (1.0 - amount))
}

fn map_channels(hex: &str, f: impl Fn(f32) -> f32) -> String {
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(0) as f32
    };
    let out: Vec<u8> = (0..3)
        .map(|i| f(channel(i * 2)).round().clamp(0.0, 255.0) as u8)
        .collect();
    format!("{:02X}{:02X}{:02X}", out[0], out[1], out[2])
}

fn table_normal() -> StyleDefinition {
    StyleDefinition::table(TABLE_NORMAL)
        .ui_priority(99)
        .with_formatting(Formatting {
            cell_margin: Some(108),
            ..Formatting::default()
        })
}

fn table_grid() -> StyleDefinition {
    StyleDefinition::table("TableGrid")
        .based_on(TABLE_NORMAL)
        .ui_priority(59)
        .with_formatting(
            Formatting::new()
                .spacing(0, 0)
                .borders(TableBorders::all(Border::single(4, "auto"))),
        )
}

fn paragraph_styles() -> Vec<StyleDefinition> {
    let mut styles = vec![
        StyleDefinition::paragraph(NORMAL)
            .ui_priority(0)
            .with_formatting(Formatting {
                spacing_after: Some(200),
                line_spacing: Some(276),
                ..Formatting::default()
            }),
        StyleDefinition::character(DEFAULT_PARAGRAPH_FONT).ui_priority(1),
        StyleDefinition::character(HYPERLINK_STYLE)
            .based_on(DEFAULT_PARAGRAPH_FONT)
            .ui_priority(99)
            .with_formatting(Formatting::new().color("0563C1").underline(Underline::Single)),
        StyleDefinition::paragraph(TITLE)
            .based_on(NORMAL)
            .ui_priority(10)
            .with_formatting(Formatting {
                size: Some(52),
                color: Some("17365D".to_string()),
                spacing_after: Some(300),
                justification: Some(Justification::Left),
                ..Formatting::default()
            }),
    ];

    for level in 1..=9u8 {
        let size = match level {
            1 => 28,
            2 => 26,
            _ => 22,
        };
        let color = if level == 1 { "365F91" } else { "4F81BD" };
        styles.push(
            StyleDefinition::paragraph(format!("Heading{}", level))
                .based_on(NORMAL)
                .ui_priority(9)
                .with_formatting(Formatting {
                    bold: Some(level <= 4),
                    italic: (level == 4 || level >= 6).then_some(true),
                    size: Some(size),
                    color: Some(color.to_string()),
                    keep_next: Some(true),
                    spacing_before: Some(if level == 1 { 480 } else { 200 }),
                    spacing_after: Some(0),
                    outline_level: Some(level - 1),
                    ..Formatting::default()
                }),
        );
    }
    styles
}

/// Names of the accented and unaccented variants of every family, plus
/// `TableGrid`, in catalog order
pub fn builtin_table_style_names() -> Vec<String> {
    let mut names = Vec::with_capacity(FAMILIES.len() * 7 + 1);
    names.push("TableGrid".to_string());
    for family in FAMILIES {
        names.push(family.id().to_string());
        for n in 1..=ACCENTS.len() {
            names.push(format!("{}-Accent{}", family.id(), n));
        }
    }
    names
}

static BUILTIN: Lazy<StyleRegistry> = Lazy::new(|| {
    let mut registry = StyleRegistry::empty();
    for style in paragraph_styles() {
        registry.insert(style);
    }
    registry.insert(table_normal());
    registry.insert(table_grid());
    for family in FAMILIES {
        registry.insert(family.build(family.id().to_string(), DARK));
        for (i, accent) in ACCENTS.iter().enumerate() {
            registry.insert(family.build(format!("{}-Accent{}", family.id(), i + 1), accent));
        }
    }
    registry
});

/// The process-wide built-in registry
pub fn builtin_registry() -> &'static StyleRegistry {
    &BUILTIN
}

/// True if `name` is part of the built-in catalog
pub fn is_builtin(name: &str) -> bool {
    BUILTIN.contains(name)
}

/// Kind of a built-in style, if it exists
pub fn builtin_kind(name: &str) -> Option<StyleKind> {
    BUILTIN.resolve(name).map(|s| s.kind)
}
