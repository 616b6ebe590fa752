use crate::foundation::error::{TesseraError, TesseraResult};

/// Number of band formats in the engine's vocabulary.
pub const FORMAT_COUNT: usize = 10;

/// Sample representation of one band of one pixel.
///
/// The ten tags are the wire-visible vocabulary for promotion tables and
/// kernel dispatch. Discriminant order is significant: promotion tables are
/// indexed by it.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum BandFormat {
    /// Unsigned 8-bit integer.
    UChar = 0,
    /// Signed 8-bit integer.
    Char = 1,
    /// Unsigned 16-bit integer.
    UShort = 2,
    /// Signed 16-bit integer.
    Short = 3,
    /// Unsigned 32-bit integer.
    UInt = 4,
    /// Signed 32-bit integer.
    Int = 5,
    /// 32-bit float.
    Float = 6,
    /// Complex pair of 32-bit floats (64 bits per sample).
    Complex = 7,
    /// 64-bit float.
    Double = 8,
    /// Complex pair of 64-bit floats (128 bits per sample).
    DpComplex = 9,
}

use BandFormat::*;

/// Sign-and-value-preserving common format for two integer operands.
///
/// Mixed-sign pairs promote to the next wider signed format so that both
/// ranges are representable, e.g. `UChar` + `Char` -> `Short`.
const LARGEST_INT: [[BandFormat; 6]; 6] = [
    /* UC */ [UChar, Short, UShort, Short, UInt, Int],
    /* C  */ [Short, Char, Int, Short, Int, Int],
    /* US */ [UShort, Int, UShort, Int, UInt, Int],
    /* S  */ [Short, Short, Int, Short, Int, Int],
    /* UI */ [UInt, Int, UInt, Int, UInt, Int],
    /* I  */ [Int, Int, Int, Int, Int, Int],
];

impl BandFormat {
    /// Every format tag, in discriminant order.
    pub const ALL: [BandFormat; FORMAT_COUNT] = [
        UChar, Char, UShort, Short, UInt, Int, Float, Complex, Double, DpComplex,
    ];

    /// Discriminant used to index promotion tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Return `true` for the six integer formats.
    pub fn is_int(self) -> bool {
        matches!(self, UChar | Char | UShort | Short | UInt | Int)
    }

    /// Return `true` for the non-complex floating formats.
    pub fn is_float(self) -> bool {
        matches!(self, Float | Double)
    }

    /// Return `true` for the complex formats.
    pub fn is_complex(self) -> bool {
        matches!(self, Complex | DpComplex)
    }

    /// Scalar components per sample: 2 for complex formats, 1 otherwise.
    pub fn components(self) -> usize {
        if self.is_complex() { 2 } else { 1 }
    }

    /// Size of one sample in bytes.
    pub fn sample_size(self) -> usize {
        match self {
            UChar | Char => 1,
            UShort | Short => 2,
            UInt | Int | Float => 4,
            Complex | Double => 8,
            DpComplex => 16,
        }
    }

    /// Smallest common format that losslessly represents both operands.
    ///
    /// Any complex operand promotes the pair to complex (double-precision
    /// when either side is `Double` or `DpComplex`); any float operand
    /// promotes to float; two integers use the sign-and-value-preserving
    /// table.
    pub fn common(a: BandFormat, b: BandFormat) -> BandFormat {
        if a.is_complex() || b.is_complex() {
            if a == DpComplex || b == DpComplex || a == Double || b == Double {
                DpComplex
            } else {
                Complex
            }
        } else if a.is_float() || b.is_float() {
            if a == Double || b == Double {
                Double
            } else {
                Float
            }
        } else {
            LARGEST_INT[a.index()][b.index()]
        }
    }

    /// Return `true` when `self` can represent every value of `other`.
    pub fn can_represent(self, other: BandFormat) -> bool {
        BandFormat::common(self, other) == self
    }
}

/// Per-operation promotion table: output format indexed by common input
/// format.
///
/// Every operation declares its full 10-entry table up front; the output
/// format is always a table lookup, never an ad hoc cast.
#[derive(Clone, Copy, Debug)]
pub struct FormatTable([BandFormat; FORMAT_COUNT]);

impl FormatTable {
    /// Build a table from its ten entries in discriminant order.
    pub const fn new(entries: [BandFormat; FORMAT_COUNT]) -> Self {
        Self(entries)
    }

    /// Output format for the given common input format.
    pub fn resolve(&self, common: BandFormat) -> BandFormat {
        self.0[common.index()]
    }
}

/// Fail unless `format` is real-valued.
pub(crate) fn check_noncomplex(op: &str, format: BandFormat) -> TesseraResult<()> {
    if format.is_complex() {
        return Err(TesseraError::configuration(format!(
            "{op}: complex input not allowed"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_integer_pairs_preserve_sign_and_value() {
        assert_eq!(BandFormat::common(UChar, Char), Short);
        assert_eq!(BandFormat::common(UShort, Short), Int);
        assert_eq!(BandFormat::common(UInt, Int), Int);
        assert_eq!(BandFormat::common(UChar, UChar), UChar);
        assert_eq!(BandFormat::common(UChar, UShort), UShort);
    }

    #[test]
    fn common_float_and_complex_promote() {
        assert_eq!(BandFormat::common(UChar, Float), Float);
        assert_eq!(BandFormat::common(Float, Double), Double);
        assert_eq!(BandFormat::common(Int, Complex), Complex);
        assert_eq!(BandFormat::common(Double, Complex), DpComplex);
        assert_eq!(BandFormat::common(Complex, DpComplex), DpComplex);
    }

    #[test]
    fn common_is_symmetric() {
        for &a in &BandFormat::ALL {
            for &b in &BandFormat::ALL {
                assert_eq!(BandFormat::common(a, b), BandFormat::common(b, a));
            }
        }
    }

    #[test]
    fn components_and_sizes() {
        assert_eq!(Complex.components(), 2);
        assert_eq!(Float.components(), 1);
        assert_eq!(DpComplex.sample_size(), 16);
        assert_eq!(UChar.sample_size(), 1);
    }
}
