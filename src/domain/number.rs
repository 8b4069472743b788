use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt::Display;

#[derive(Clone, Copy, Debug)]
pub enum Number {
    PositiveInt(u64),
    NegativeInt(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::PositiveInt(n) => *n as f64,
            Number::NegativeInt(n) => *n as f64,
            Number::Float(n) => *n,
        }
    }
}

impl From<u8> for Number {
    fn from(value: u8) -> Self {
        Number::PositiveInt(value as u64)
    }
}

impl From<u16> for Number {
    fn from(value: u16) -> Self {
        Number::PositiveInt(value as u64)
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Number::PositiveInt(value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        if value >= 0 { Number::PositiveInt(value as u64) } else { Number::NegativeInt(value) }
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            // Integer vs Integer
            (Number::PositiveInt(a), Number::PositiveInt(b)) => a.partial_cmp(b),
            (Number::NegativeInt(a), Number::NegativeInt(b)) => a.partial_cmp(b),
            (Number::PositiveInt(a), Number::NegativeInt(b)) => {
                if *b < 0 {
                    Some(Ordering::Greater)
                } else {
                    a.partial_cmp(&(*b as u64))
                }
            }
            (Number::NegativeInt(a), Number::PositiveInt(b)) => {
                if *a < 0 {
                    Some(Ordering::Less)
                } else {
                    (*a as u64).partial_cmp(b)
                }
            }
            // Float vs Anything
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::PositiveInt(n) => write!(f, "{}", n),
            Number::NegativeInt(n) => write!(f, "{}", n),
            Number::Float(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Number::PositiveInt(n) => serializer.serialize_u64(*n),
            Number::NegativeInt(n) => serializer.serialize_i64(*n),
            Number::Float(n) => serializer.serialize_f64(*n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Number::PositiveInt(42), Number::PositiveInt(42))]
    #[case(Number::PositiveInt(42), Number::NegativeInt(42))]
    #[case(Number::PositiveInt(42), Number::Float(42.0))]
    #[case(Number::NegativeInt(-42), Number::NegativeInt(-42))]
    #[case(Number::NegativeInt(-42), Number::Float(-42.0))]
    #[case(Number::Float(21.5), Number::Float(21.5))]
    fn compare_equals(#[case] a: Number, #[case] b: Number) {
        assert_eq!(a.partial_cmp(&b), Some(Ordering::Equal));
        assert_eq!(a, b);
    }

    #[rstest]
    #[case(Number::PositiveInt(42), Number::PositiveInt(7))]
    #[case(Number::PositiveInt(0), Number::NegativeInt(-1))]
    #[case(Number::PositiveInt(42), Number::Float(41.999))]
    #[case(Number::Float(-1.5), Number::NegativeInt(-2))]
    fn compare_greater_than(#[case] a: Number, #[case] b: Number) {
        assert_eq!(a.partial_cmp(&b), Some(Ordering::Greater));
    }

    #[rstest]
    #[case(Number::from(-3i64), Number::NegativeInt(-3))]
    #[case(Number::from(3i64), Number::PositiveInt(3))]
    #[case(Number::from(1013.25), Number::Float(1013.25))]
    fn from_picks_the_matching_variant(#[case] number: Number, #[case] expected: Number) {
        assert_eq!(format!("{:?}", number), format!("{:?}", expected));
    }

    #[test]
    fn serializes_as_a_plain_json_number() {
        assert_eq!(serde_json::to_string(&Number::PositiveInt(400)).unwrap(), "400");
        assert_eq!(serde_json::to_string(&Number::NegativeInt(-4)).unwrap(), "-4");
        assert_eq!(serde_json::to_string(&Number::Float(21.5)).unwrap(), "21.5");
    }
}
