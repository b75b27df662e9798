use bitflags::bitflags;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// JSON 能精確表示的最大整數
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_991.0;

/// 整數值的非負浮點數（如 4.0）視為整數位掩碼
pub fn integral_mask(value: f64) -> Option<u64> {
    (value.fract() == 0.0 && (0.0..=MAX_EXACT_INTEGER).contains(&value)).then_some(value as u64)
}

// 位掩碼的反序列化：接受非負整數與整數值浮點數
struct MaskVisitor;

impl<'de> Visitor<'de> for MaskVisitor {
    type Value = u64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a non-negative integer bitmask")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<u64, E> {
        Ok(value)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<u64, E> {
        u64::try_from(value).map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<u64, E> {
        integral_mask(value).ok_or_else(|| E::invalid_value(de::Unexpected::Float(value), &self))
    }
}

bitflags! {
    /// 疾病與族群代碼
    ///
    /// | bit | value | meaning                 |
    /// |-----|-------|-------------------------|
    /// | 0   | 1     | diabetes                |
    /// | 1   | 2     | hypertension            |
    /// | 2   | 4     | gout                    |
    /// | 3   | 8     | hyperlipidemia          |
    /// | 4   | 16    | teenager                |
    /// | 5   | 32    | maternity / postpartum  |
    /// | 6   | 64    | elderly                 |
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Conditions: u64 {
        const DIABETES = 1 << 0;
        const HYPERTENSION = 1 << 1;
        const GOUT = 1 << 2;
        const HYPERLIPIDEMIA = 1 << 3;
        const TEENAGER = 1 << 4;
        const MATERNITY = 1 << 5;
        const ELDERLY = 1 << 6;
    }
}

bitflags! {
    /// 過敏原與忌口食材代碼
    ///
    /// | bit | value | meaning           |
    /// |-----|-------|-------------------|
    /// | 0   | 1     | seafood           |
    /// | 1   | 2     | nuts              |
    /// | 2   | 4     | garlic / scallion |
    /// | 3   | 8     | spicy             |
    /// | 4   | 16    | dairy             |
    /// | 5   | 32    | egg               |
    /// | 6   | 64    | soy               |
    /// | 7   | 128   | gluten            |
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Allergens: u64 {
        const SEAFOOD = 1 << 0;
        const NUTS = 1 << 1;
        const GARLIC_SCALLION = 1 << 2;
        const SPICY = 1 << 3;
        const DAIRY = 1 << 4;
        const EGG = 1 << 5;
        const SOY = 1 << 6;
        const GLUTEN = 1 << 7;
    }
}

macro_rules! mask_helpers {
    ($name:ident) => {
        impl $name {
            /// flag 的每一個位元都已設定
            pub fn has_flag(self, flag: Self) -> bool {
                self.contains(flag)
            }

            /// 兩個掩碼共同設定的位元數，未命名的位元也計入
            pub fn overlap_count(self, other: Self) -> u32 {
                (self.bits() & other.bits()).count_ones()
            }

            /// 已設定的具名旗標名稱
            pub fn labels(self) -> Vec<&'static str> {
                self.iter_names().map(|(name, _)| name).collect()
            }
        }

        impl From<u64> for $name {
            fn from(bits: u64) -> Self {
                Self::from_bits_retain(bits)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u64(self.bits())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer
                    .deserialize_u64(MaskVisitor)
                    .map(Self::from_bits_retain)
            }
        }
    };
}

mask_helpers!(Conditions);
mask_helpers!(Allergens);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_bit_positions() {
        assert_eq!(Conditions::DIABETES.bits(), 1);
        assert_eq!(Conditions::HYPERTENSION.bits(), 2);
        assert_eq!(Conditions::GOUT.bits(), 4);
        assert_eq!(Conditions::HYPERLIPIDEMIA.bits(), 8);
        assert_eq!(Conditions::TEENAGER.bits(), 16);
        assert_eq!(Conditions::MATERNITY.bits(), 32);
        assert_eq!(Conditions::ELDERLY.bits(), 64);
    }

    #[test]
    fn test_unknown_bits_are_retained() {
        let mask = Conditions::from(0b1_0000_0001);
        assert_eq!(mask.bits(), 257);
        assert!(mask.has_flag(Conditions::DIABETES));
        assert_eq!(mask.labels(), vec!["DIABETES"]);
    }

    #[test]
    fn test_overlap_count_counts_every_shared_bit() {
        let user = Conditions::from(0b1011);
        let dish = Conditions::from(0b1110);
        assert_eq!(user.overlap_count(dish), 2);
        assert!(user.intersects(dish));
        assert_eq!(Conditions::empty().overlap_count(dish), 0);
    }

    #[test]
    fn test_masks_round_trip_as_plain_integers() {
        let allergens = Allergens::SPICY | Allergens::GARLIC_SCALLION;
        assert_eq!(serde_json::to_string(&allergens).unwrap(), "12");

        let parsed: Allergens = serde_json::from_str("12").unwrap();
        assert_eq!(parsed, allergens);

        assert!(serde_json::from_str::<Conditions>("-1").is_err());
        assert!(serde_json::from_str::<Conditions>("\"1\"").is_err());
    }

    #[test]
    fn test_integral_float_masks_are_integers() {
        let parsed: Conditions = serde_json::from_str("4.0").unwrap();
        assert_eq!(parsed, Conditions::GOUT);

        assert!(serde_json::from_str::<Conditions>("1.5").is_err());
        assert!(serde_json::from_str::<Allergens>("-2.0").is_err());

        assert_eq!(integral_mask(8.0), Some(8));
        assert_eq!(integral_mask(0.5), None);
        assert_eq!(integral_mask(f64::NAN), None);
    }
}
