//! The `injectable!` declaration macro.

/// Declares a struct and implements [`Injectable`](crate::Injectable) for it.
///
/// Fields carrying the parameterless `#[inject]` marker are opted into
/// injection, in declaration order; all other fields are left alone. A marked
/// field must have type `Option<Arc<S>>`, and `#[inject]` must be the first
/// attribute on it.
///
/// Only non-generic structs with named fields are supported; implement
/// `Injectable` by hand for anything else.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{injectable, Injectable, ServiceRegistry};
/// use std::sync::Arc;
///
/// pub trait Audio: Send + Sync {
///     fn volume(&self) -> u8;
/// }
///
/// pub struct Mixer;
/// impl Audio for Mixer {
///     fn volume(&self) -> u8 { 11 }
/// }
///
/// pub struct Settings { pub difficulty: u8 }
///
/// injectable! {
///     #[derive(Default)]
///     pub struct Player {
///         #[inject]
///         audio: Option<Arc<dyn Audio>>,
///         #[inject]
///         pub settings: Option<Arc<Settings>>,
///         pub score: u32,
///     }
/// }
///
/// let fields: Vec<_> = Player::injectable_fields()
///     .iter()
///     .map(|f| f.descriptor().field_name)
///     .collect();
/// assert_eq!(fields, ["audio", "settings"]);
///
/// let registry = ServiceRegistry::new();
/// registry.register_shared::<dyn Audio>(Arc::new(Mixer));
/// registry.register_instance(Settings { difficulty: 3 });
///
/// let (player, report) = registry.construct::<Player>();
/// assert!(report.is_complete());
/// assert_eq!(player.audio.as_ref().unwrap().volume(), 11);
/// assert_eq!(player.settings.as_ref().unwrap().difficulty, 3);
/// assert_eq!(player.score, 0);
/// ```
#[macro_export]
macro_rules! injectable {
    // Every field consumed: emit the struct and its field table.
    (@field [$($head:tt)*] $name:ident [$($fields:tt)*] [$($marked:ident : $mty:ty;)*]) => {
        $($head)* {
            $($fields)*
        }

        impl $crate::Injectable for $name {
            fn injectable_fields() -> ::std::vec::Vec<$crate::InjectableField<Self>> {
                ::std::vec![
                    $({
                        fn slot(target: &mut $name) -> &mut $mty {
                            &mut target.$marked
                        }
                        $crate::InjectableField::new(::std::stringify!($marked), slot)
                    }),*
                ]
            }
        }
    };

    // Marked field.
    (@field $head:tt $name:ident [$($fields:tt)*] [$($marked:tt)*]
        #[inject]
        $(#[$fmeta:meta])*
        $fvis:vis $fname:ident : $fty:ty
        $(, $($rest:tt)*)?
    ) => {
        $crate::injectable!(@field $head $name
            [$($fields)* $(#[$fmeta])* $fvis $fname : $fty,]
            [$($marked)* $fname : $fty;]
            $($($rest)*)?
        );
    };

    // Plain field.
    (@field $head:tt $name:ident [$($fields:tt)*] [$($marked:tt)*]
        $(#[$fmeta:meta])*
        $fvis:vis $fname:ident : $fty:ty
        $(, $($rest:tt)*)?
    ) => {
        $crate::injectable!(@field $head $name
            [$($fields)* $(#[$fmeta])* $fvis $fname : $fty,]
            [$($marked)*]
            $($($rest)*)?
        );
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($body:tt)*
        }
    ) => {
        $crate::injectable!(@field [$(#[$meta])* $vis struct $name] $name [] [] $($body)*);
    };
}
