//! "Effectively equal" comparison behind `Equal`.

use crate::value::{NumType, Value};

/// Whether `a` and `b` are effectively equal.
///
/// Steps, stopping at the first that holds:
/// 1. nil on either side: equal only if both are nil
/// 2. structural equality in type and value
/// 3. identity (handles to the same allocation)
/// 4. `b` converted exactly to `a`'s numeric type, then steps 2 and 3 again
/// 5. the canonical, type-annotated renderings match
pub fn are_equal(a: &Value, b: &Value) -> bool {
    if a.is_nil() || b.is_nil() {
        return a.is_nil() && b.is_nil();
    }
    if a == b || a.same(b) {
        return true;
    }
    if let Some(converted) = convert(b, a) {
        if &converted == a || converted.same(a) {
            return true;
        }
    }
    // Catches values structural equality rejects but that render the same,
    // such as two NaNs of one float type.
    a.canonical() == b.canonical()
}

/// Convert a numeric `value` into the numeric type of `target`.
///
/// Only conversions that lose nothing are allowed: `1.0_f64` converts to
/// `i32` but `1.5_f64` does not, and `300_i32` does not fit in `u8`.
pub fn convert(value: &Value, target: &Value) -> Option<Value> {
    match target {
        Value::Int { ty, .. } | Value::Uint { ty, .. } | Value::Float { ty, .. } => {
            to_num_type(value, *ty)
        }
        _ => None,
    }
}

enum Range {
    Signed(i128, i128),
    Unsigned(u128),
    Float32,
    Float64,
}

fn range(ty: NumType) -> Range {
    match ty {
        NumType::I8 => Range::Signed(i8::MIN.into(), i8::MAX.into()),
        NumType::I16 => Range::Signed(i16::MIN.into(), i16::MAX.into()),
        NumType::I32 => Range::Signed(i32::MIN.into(), i32::MAX.into()),
        NumType::I64 => Range::Signed(i64::MIN.into(), i64::MAX.into()),
        NumType::I128 => Range::Signed(i128::MIN, i128::MAX),
        NumType::Isize => Range::Signed(isize::MIN as i128, isize::MAX as i128),
        NumType::U8 => Range::Unsigned(u8::MAX.into()),
        NumType::U16 => Range::Unsigned(u16::MAX.into()),
        NumType::U32 => Range::Unsigned(u32::MAX.into()),
        NumType::U64 => Range::Unsigned(u64::MAX.into()),
        NumType::U128 => Range::Unsigned(u128::MAX),
        NumType::Usize => Range::Unsigned(usize::MAX as u128),
        NumType::F32 => Range::Float32,
        NumType::F64 => Range::Float64,
    }
}

fn to_num_type(value: &Value, ty: NumType) -> Option<Value> {
    match (range(ty), value) {
        (Range::Signed(min, max), Value::Int { v, .. }) => {
            (min..=max).contains(v).then(|| Value::Int { ty, v: *v })
        }
        (Range::Signed(_, max), Value::Uint { v, .. }) => i128::try_from(*v)
            .ok()
            .filter(|v| *v <= max)
            .map(|v| Value::Int { ty, v }),
        (Range::Signed(min, max), Value::Float { v, .. }) => exact_i128(*v)
            .filter(|i| (min..=max).contains(i))
            .map(|v| Value::Int { ty, v }),
        (Range::Unsigned(max), Value::Int { v, .. }) => u128::try_from(*v)
            .ok()
            .filter(|v| *v <= max)
            .map(|v| Value::Uint { ty, v }),
        (Range::Unsigned(max), Value::Uint { v, .. }) => {
            (*v <= max).then(|| Value::Uint { ty, v: *v })
        }
        (Range::Unsigned(max), Value::Float { v, .. }) => exact_u128(*v)
            .filter(|u| *u <= max)
            .map(|v| Value::Uint { ty, v }),
        (Range::Float64, Value::Int { v, .. }) => {
            let f = *v as f64;
            (exact_i128(f) == Some(*v)).then(|| Value::Float { ty, v: f })
        }
        (Range::Float64, Value::Uint { v, .. }) => {
            let f = *v as f64;
            (exact_u128(f) == Some(*v)).then(|| Value::Float { ty, v: f })
        }
        (Range::Float64, Value::Float { v, .. }) => Some(Value::Float { ty, v: *v }),
        (Range::Float32, Value::Int { v, .. }) => {
            let f = f64::from(*v as f32);
            (exact_i128(f) == Some(*v)).then(|| Value::Float { ty, v: f })
        }
        (Range::Float32, Value::Uint { v, .. }) => {
            let f = f64::from(*v as f32);
            (exact_u128(f) == Some(*v)).then(|| Value::Float { ty, v: f })
        }
        (Range::Float32, Value::Float { v, .. }) => {
            let f = *v as f32;
            (f64::from(f) == *v).then(|| Value::Float { ty, v: *v })
        }
        _ => None,
    }
}

/// 2^127 and 2^128, the first floats past `i128::MAX` and `u128::MAX`.
const I128_END: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
const U128_END: f64 = 340_282_366_920_938_463_463_374_607_431_768_211_456.0;

/// A finite float with no fractional part.
fn whole(v: f64) -> Option<f64> {
    (v.is_finite() && v.fract() == 0.0).then_some(v)
}

/// `v` as an `i128`, when it is whole and inside the `i128` range.
/// Range is checked on the float so a saturating cast never passes.
fn exact_i128(v: f64) -> Option<i128> {
    whole(v)
        .filter(|f| (-I128_END..I128_END).contains(f))
        .map(|f| f as i128)
}

/// `v` as a `u128`, when it is whole and inside the `u128` range.
fn exact_u128(v: f64) -> Option<u128> {
    whole(v)
        .filter(|f| (0.0..U128_END).contains(f))
        .map(|f| f as u128)
}
