//! Named colors (CSS palette subset), opaque.

use super::Color;

pub const RED: Color = Color::from_rgba_u32(0xFF00_00FF);
pub const GREEN: Color = Color::from_rgba_u32(0x00FF_00FF);
pub const BLUE: Color = Color::from_rgba_u32(0x0000_FFFF);
pub const YELLOW: Color = Color::from_rgba_u32(0xFFFF_00FF);
pub const MAGENTA: Color = Color::from_rgba_u32(0xFF00_FFFF);
pub const CYAN: Color = Color::from_rgba_u32(0x00FF_FFFF);
pub const WHITE: Color = Color::from_rgba_u32(0xFFFF_FFFF);
pub const BLACK: Color = Color::from_rgba_u32(0x0000_00FF);
pub const GRAY: Color = Color::from_rgba_u32(0x8080_80FF);
pub const MAROON: Color = Color::from_rgba_u32(0x8000_00FF);
pub const DARK_GREEN: Color = Color::from_rgba_u32(0x0080_00FF);
pub const NAVY: Color = Color::from_rgba_u32(0x0000_80FF);
pub const OLIVE: Color = Color::from_rgba_u32(0x8080_00FF);
pub const PURPLE: Color = Color::from_rgba_u32(0x8000_80FF);
pub const TEAL: Color = Color::from_rgba_u32(0x0080_80FF);
pub const ORANGE: Color = Color::from_rgba_u32(0xFFA5_00FF);
pub const BROWN: Color = Color::from_rgba_u32(0xA52A_2AFF);
pub const BURLY_WOOD: Color = Color::from_rgba_u32(0xDEB8_87FF);
pub const CADET_BLUE: Color = Color::from_rgba_u32(0x5F9E_A0FF);
pub const CHARTREUSE: Color = Color::from_rgba_u32(0x7FFF_00FF);
pub const CHOCOLATE: Color = Color::from_rgba_u32(0xD269_1EFF);
pub const CORAL: Color = Color::from_rgba_u32(0xFF7F_50FF);
pub const CORNFLOWER_BLUE: Color = Color::from_rgba_u32(0x6495_EDFF);
pub const CORNSILK: Color = Color::from_rgba_u32(0xFFF8_DCFF);
pub const CRIMSON: Color = Color::from_rgba_u32(0xDC14_3CFF);
pub const AQUA: Color = Color::from_rgba_u32(0x00FF_FFFF);
pub const GOLD: Color = Color::from_rgba_u32(0xFFD7_00FF);
pub const GOLDEN_ROD: Color = Color::from_rgba_u32(0xDAA5_20FF);
pub const GREEN_YELLOW: Color = Color::from_rgba_u32(0xADFF_2FFF);
pub const LIGHT_CORAL: Color = Color::from_rgba_u32(0xF080_80FF);
pub const SALMON: Color = Color::from_rgba_u32(0xFA80_72FF);
pub const DARK_SALMON: Color = Color::from_rgba_u32(0xE996_7AFF);
pub const LIGHT_SALMON: Color = Color::from_rgba_u32(0xFFA0_7AFF);
pub const LIGHT_SEA_GREEN: Color = Color::from_rgba_u32(0x20B2_AAFF);
pub const MEDIUM_SEA_GREEN: Color = Color::from_rgba_u32(0x3CB3_71FF);
pub const SEA_GREEN: Color = Color::from_rgba_u32(0x2E8B_57FF);
pub const DARK_SLATE_GRAY: Color = Color::from_rgba_u32(0x2F4F_4FFF);
pub const SLATE_GRAY: Color = Color::from_rgba_u32(0x7080_90FF);
pub const LIGHT_SLATE_GRAY: Color = Color::from_rgba_u32(0x7788_99FF);
pub const MEDIUM_SLATE_BLUE: Color = Color::from_rgba_u32(0x7B68_EEFF);
pub const SLATE_BLUE: Color = Color::from_rgba_u32(0x6A5A_CDFF);
pub const DARK_SLATE_BLUE: Color = Color::from_rgba_u32(0x483D_8BFF);
pub const LAVENDER: Color = Color::from_rgba_u32(0xE6E6_FAFF);
pub const THISTLE: Color = Color::from_rgba_u32(0xD8BF_D8FF);
pub const PLUM: Color = Color::from_rgba_u32(0xDDA0_DDFF);
pub const VIOLET: Color = Color::from_rgba_u32(0xEE82_EEFF);
pub const ORCHID: Color = Color::from_rgba_u32(0xDA70_D6FF);
pub const FUCHSIA: Color = Color::from_rgba_u32(0xFF00_FFFF);
pub const MEDIUM_ORCHID: Color = Color::from_rgba_u32(0xBA55_D3FF);
pub const DARK_ORCHID: Color = Color::from_rgba_u32(0x9932_CCFF);
pub const DARK_VIOLET: Color = Color::from_rgba_u32(0x9400_D3FF);
pub const BLUE_VIOLET: Color = Color::from_rgba_u32(0x8A2B_E2FF);
pub const DARK_MAGENTA: Color = Color::from_rgba_u32(0x8B00_8BFF);
pub const MEDIUM_PURPLE: Color = Color::from_rgba_u32(0x9370_DBFF);
pub const MEDIUM_TURQUOISE: Color = Color::from_rgba_u32(0x48D1_CCFF);
pub const TURQUOISE: Color = Color::from_rgba_u32(0x40E0_D0FF);
pub const LIGHT_SKY_BLUE: Color = Color::from_rgba_u32(0x87CE_FAFF);
pub const SKY_BLUE: Color = Color::from_rgba_u32(0x87CE_EBFF);
pub const DEEP_SKY_BLUE: Color = Color::from_rgba_u32(0x00BF_FFFF);
pub const LIGHT_BLUE: Color = Color::from_rgba_u32(0xADD8_E6FF);
pub const POWDER_BLUE: Color = Color::from_rgba_u32(0xB0E0_E6FF);
pub const PALE_TURQUOISE: Color = Color::from_rgba_u32(0xAFEE_EEFF);
pub const DARK_TURQUOISE: Color = Color::from_rgba_u32(0x00CE_D1FF);
pub const LIGHT_CYAN: Color = Color::from_rgba_u32(0xE0FF_FFFF);
pub const LIGHT_GOLDENROD_YELLOW: Color = Color::from_rgba_u32(0xFAFA_D2FF);
pub const LEMON_CHIFFON: Color = Color::from_rgba_u32(0xFFFA_CDFF);
pub const LIGHT_YELLOW: Color = Color::from_rgba_u32(0xFFFF_E0FF);
pub const LIGHT_GREEN: Color = Color::from_rgba_u32(0x90EE_90FF);
pub const PALE_GREEN: Color = Color::from_rgba_u32(0x98FB_98FF);
pub const DARK_SEA_GREEN: Color = Color::from_rgba_u32(0x8FBC_8FFF);
pub const LINEN: Color = Color::from_rgba_u32(0xFAF0_E6FF);
pub const MISTY_ROSE: Color = Color::from_rgba_u32(0xFFE4_E1FF);
pub const MOCCASIN: Color = Color::from_rgba_u32(0xFFE4_B5FF);
pub const NAVAJO_WHITE: Color = Color::from_rgba_u32(0xFFDE_ADFF);
pub const OLD_LACE: Color = Color::from_rgba_u32(0xFDF5_E6FF);
pub const PAPAYA_WHIP: Color = Color::from_rgba_u32(0xFFEF_D5FF);
pub const PEACH_PUFF: Color = Color::from_rgba_u32(0xFFDA_B9FF);
pub const PERU: Color = Color::from_rgba_u32(0xCD85_3FFF);
pub const PINK: Color = Color::from_rgba_u32(0xFFC0_CBFF);
pub const LIGHT_PINK: Color = Color::from_rgba_u32(0xFFB6_C1FF);
pub const HOT_PINK: Color = Color::from_rgba_u32(0xFF69_B4FF);
pub const DEEP_PINK: Color = Color::from_rgba_u32(0xFF14_93FF);
pub const MEDIUM_VIOLET_RED: Color = Color::from_rgba_u32(0xC715_85FF);
pub const PALE_VIOLET_RED: Color = Color::from_rgba_u32(0xDB70_93FF);
pub const ROSY_BROWN: Color = Color::from_rgba_u32(0xBC8F_8FFF);
pub const SANDY_BROWN: Color = Color::from_rgba_u32(0xF4A4_60FF);
pub const GOLDENROD: Color = Color::from_rgba_u32(0xDAA5_20FF);
pub const KHAKI: Color = Color::from_rgba_u32(0xF0E6_8CFF);
pub const LAVENDER_BLUSH: Color = Color::from_rgba_u32(0xFFF0_F5FF);
pub const LAWN_GREEN: Color = Color::from_rgba_u32(0x7CFC_00FF);
pub const LIME: Color = Color::from_rgba_u32(0x00FF_00FF);
pub const LIME_GREEN: Color = Color::from_rgba_u32(0x32CD_32FF);
pub const MINT_CREAM: Color = Color::from_rgba_u32(0xF5FF_FAFF);
pub const ALICE_BLUE: Color = Color::from_rgba_u32(0xF0F8_FFFF);
pub const ANTIQUE_WHITE: Color = Color::from_rgba_u32(0xFAEB_D7FF);
pub const AZURE: Color = Color::from_rgba_u32(0xF0FF_FFFF);
pub const BEIGE: Color = Color::from_rgba_u32(0xF5F5_DCFF);
pub const BISQUE: Color = Color::from_rgba_u32(0xFFE4_C4FF);
pub const BLANCHED_ALMOND: Color = Color::from_rgba_u32(0xFFEB_CDFF);
pub const HONEYDEW: Color = Color::from_rgba_u32(0xF0FF_F0FF);
pub const IVORY: Color = Color::from_rgba_u32(0xFFFF_F0FF);
pub const LIGHT_GRAY: Color = Color::from_rgba_u32(0xD3D3_D3FF);
pub const LIGHT_STEEL_BLUE: Color = Color::from_rgba_u32(0xB0C4_DEFF);
pub const MEDIUM_AQUAMARINE: Color = Color::from_rgba_u32(0x66CD_AAFF);
pub const MEDIUM_BLUE: Color = Color::from_rgba_u32(0x0000_CDFF);
