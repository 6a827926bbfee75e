/// The closed set of kinds a [`Variant`](crate::Variant) can hold.
///
/// A vector value reports the type of its elements together with
/// [`Variant::is_vector`](crate::Variant::is_vector).
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum VariantType {
    Null = 0,
    Bool = 1,
    Int8 = 2,
    Int16 = 3,
    Int32 = 4,
    Int64 = 5,
    UInt8 = 6,
    UInt16 = 7,
    UInt32 = 8,
    UInt64 = 9,
    Float32 = 10,
    Float64 = 11,
    Complex32 = 12,
    Complex64 = 13,
    String = 14,
    Map = 15,
    List = 16,
    Timestamp = 17,
    Duration = 18,
    Custom = 19,
}

impl VariantType {
    /// Returns `true` for the fixed-width integer kinds.
    ///
    /// # Example
    ///
    /// ```
    /// use argmap::VariantType;
    ///
    /// assert!(VariantType::Int16.is_integer());
    /// assert!(VariantType::UInt64.is_integer());
    /// assert!(!VariantType::Bool.is_integer());
    /// assert!(!VariantType::Float32.is_integer());
    /// ```
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::UInt8
                | Self::UInt16
                | Self::UInt32
                | Self::UInt64
        )
    }

    /// Returns `true` for the signed integer kinds.
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Returns `true` for every kind the coercion engine treats as a number:
    /// booleans, integers and floats.
    ///
    /// # Example
    ///
    /// ```
    /// use argmap::VariantType;
    ///
    /// assert!(VariantType::Bool.is_numeric());
    /// assert!(VariantType::Float64.is_numeric());
    /// assert!(!VariantType::Complex32.is_numeric());
    /// assert!(!VariantType::String.is_numeric());
    /// ```
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Bool) || self.is_integer() || self.is_float()
    }

    pub const fn is_complex(self) -> bool {
        matches!(self, Self::Complex32 | Self::Complex64)
    }

    pub const fn is_time(self) -> bool {
        matches!(self, Self::Timestamp | Self::Duration)
    }

    /// Returns `true` if this kind is a map or a list.
    ///
    /// # Example
    ///
    /// ```
    /// use argmap::VariantType;
    ///
    /// assert!(VariantType::Map.is_container());
    /// assert!(VariantType::List.is_container());
    /// assert!(!VariantType::Custom.is_container());
    /// ```
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Map | Self::List)
    }

    /// Returns `true` if a homogeneous vector of this kind can exist.
    pub const fn is_vector_element(self) -> bool {
        self.is_numeric() || self.is_complex() || self.is_time() || matches!(self, Self::String)
    }

    /// Lower-case name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Complex32 => "complex32",
            Self::Complex64 => "complex64",
            Self::String => "string",
            Self::Map => "map",
            Self::List => "list",
            Self::Timestamp => "timestamp",
            Self::Duration => "duration",
            Self::Custom => "custom",
        }
    }
}
