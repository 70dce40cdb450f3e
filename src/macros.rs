macro_rules! data_format {
    ($e:expr) => {
        Err($crate::error::Error::DataFormat(::std::string::String::from($e)))
    };
    ($fmt:expr, $($arg:tt)+) => {
        Err($crate::error::Error::DataFormat(format!($fmt, $($arg)+)))
    };
}

macro_rules! unsupported {
    ($e:expr) => {
        Err($crate::error::Error::Unsupported(::std::string::String::from($e)))
    };
    ($fmt:expr, $($arg:tt)+) => {
        Err($crate::error::Error::Unsupported(format!($fmt, $($arg)+)))
    };
}

macro_rules! invalid_argument {
    ($e:expr) => {
        Err($crate::error::Error::ArgumentInvalid(
            ::std::string::String::from($e),
        ))
    };
    ($fmt:expr, $($arg:tt)+) => {
        Err($crate::error::Error::ArgumentInvalid(format!($fmt, $($arg)+)))
    };
}
