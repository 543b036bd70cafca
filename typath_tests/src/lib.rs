#[cfg(test)]
mod round_trip;
#[cfg(test)]
mod serialize;

/// Shorthand for building [`typath::ObjectShape`] out of `(name, shape)` pairs,
/// with every field required.
#[cfg(test)]
macro_rules! object {
    ($($name:literal: $shape:expr),* $(,)?) => {
        ::typath::ObjectShape::new()$(.field($name, $shape))*
    };
}

#[cfg(test)]
pub(crate) use object;
