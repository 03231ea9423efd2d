mod array2d;

pub use self::array2d::Array2D;
