/// Declares a public constant that combines several flags of a bitflags type.
///
/// ```ignore
/// pub_const_flag!(SAMPLED_ATTACHMENT, wgpu::TextureUsages, RENDER_ATTACHMENT, TEXTURE_BINDING);
/// ```
#[macro_export]
macro_rules! pub_const_flag {
    ($name:ident, $t:ty, $($flag:ident),+ $(,)?) => {
        pub const $name: $t = <$t>::from_bits_truncate(
            $crate::bitor_variadic!($t, $($flag),+)
        );
    };
}

#[macro_export]
#[doc(hidden)]
// Used by `pub_const_flag!` to combine bitflags using | on .bits()
macro_rules! bitor_variadic {
    // Match the trivial case
    ($t:ty, $flag:ident) => {
        <$t>::$flag.bits()
    };
    // Peel one flag off and recurse on the rest
    ($t:ty, $flag:ident, $($rest:ident),+) => {
        <$t>::$flag.bits() | $crate::bitor_variadic!($t, $($rest),+)
    };
}
