mod obj;

pub use self::obj::*;
