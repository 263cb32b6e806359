//===========================================================================//

// Returns early from the enclosing function with an `io::Error` of the given
// kind, formatting the remaining arguments into its message.
macro_rules! bail_io {
    ($kind:ident, $($arg:tt)+) => {
        return Err(::std::io::Error::new(
            ::std::io::ErrorKind::$kind,
            format!($($arg)+),
        ))
    };
}

// For malformed bytes read from a stream or file.
macro_rules! invalid_data {
    ($($arg:tt)+) => {
        bail_io!(InvalidData, $($arg)+)
    };
}

// For arguments the caller should not have passed.
macro_rules! invalid_input {
    ($($arg:tt)+) => {
        bail_io!(InvalidInput, $($arg)+)
    };
}

//===========================================================================//
