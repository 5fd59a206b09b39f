//! Display names of use cases and controllers.

/// Returns the unqualified name of `T`, without generic arguments.
///
/// `my_app::users::SignInController<Db>` becomes `SignInController`.
#[must_use]
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SignInController;
    struct Wrapper<T>(T);

    #[test]
    fn test_plain_type() {
        assert_eq!(short_type_name::<SignInController>(), "SignInController");
    }

    #[test]
    fn test_generic_type() {
        assert_eq!(short_type_name::<Wrapper<SignInController>>(), "Wrapper");
        assert_eq!(short_type_name::<String>(), "String");
    }
}
