//! NaN-payload boxing.
//!
//! A separate facility layered on top of [`Word`](crate::word::Word)'s
//! `f64` view. An `f64` that is not NaN is a plain double; one that is NaN
//! carries a 4-bit type tag in bits 48-51 and a 48-bit payload in bits 0-47.
//! Not used by the interpreter's own stack handling, which reinterprets
//! cells per opcode rather than tagging them — this module exists for
//! toolchains built on top of the VM that want tagged values.

use crate::word::Word;

/// High bit always set, so a boxed tag never collides with bits a caller
/// might otherwise leave zeroed in an arbitrary quiet NaN.
pub const INTEGER_TAG: u64 = 0b1001;
pub const POINTER_TAG: u64 = 0b1010;

const EXPONENT_MASK: u64 = 0x7ff << 52;
const TYPE_SHIFT: u32 = 48;
const TYPE_MASK: u64 = 0xf << TYPE_SHIFT;
const VALUE_MASK: u64 = (1u64 << 48) - 1;

fn with_type(bits: u64, tag: u64) -> u64 {
    (bits & !TYPE_MASK) | ((tag << TYPE_SHIFT) & TYPE_MASK)
}

fn with_value(bits: u64, value: u64) -> u64 {
    (bits & !VALUE_MASK) | (value & VALUE_MASK)
}

fn type_of(bits: u64) -> u64 {
    (bits & TYPE_MASK) >> TYPE_SHIFT
}

fn value_of(bits: u64) -> u64 {
    bits & VALUE_MASK
}

pub fn box_double(d: f64) -> Word {
    Word::from_f64(d)
}

pub fn box_integer(u: u64) -> Word {
    assert!(u < (1 << 48), "integer payload does not fit in 48 bits");
    let bits = with_value(with_type(EXPONENT_MASK, INTEGER_TAG), u);
    Word::from_f64(f64::from_bits(bits))
}

pub fn box_pointer(p: *const ()) -> Word {
    let addr = p as u64;
    assert!(addr < (1 << 48), "pointer does not fit in 48 bits");
    let bits = with_value(with_type(EXPONENT_MASK, POINTER_TAG), addr);
    Word::from_f64(f64::from_bits(bits))
}

pub fn is_double(w: Word) -> bool {
    !w.f64().is_nan()
}

pub fn is_integer(w: Word) -> bool {
    w.f64().is_nan() && type_of(w.bits()) == INTEGER_TAG
}

pub fn is_pointer(w: Word) -> bool {
    w.f64().is_nan() && type_of(w.bits()) == POINTER_TAG
}

pub fn unbox_double(w: Word) -> f64 {
    if is_double(w) {
        w.f64()
    } else {
        0.0
    }
}

pub fn unbox_integer(w: Word) -> u64 {
    if is_integer(w) {
        value_of(w.bits())
    } else {
        0
    }
}

pub fn unbox_pointer(w: Word) -> *const () {
    if is_pointer(w) {
        value_of(w.bits()) as *const ()
    } else {
        std::ptr::null()
    }
}
