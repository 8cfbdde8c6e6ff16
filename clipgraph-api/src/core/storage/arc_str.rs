use serde::{Deserialize, Serialize};
use std::{
    borrow::Borrow,
    cmp::Ordering,
    fmt,
    fmt::{Display, Formatter},
    ops::Deref,
    sync::Arc,
};

/// Cheaply clonable immutable string, shared between attribute maps, tables and graph metadata.
#[derive(Clone, Debug, Eq, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArcStr(pub Arc<str>);

impl ArcStr {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ArcStr {
    fn default() -> Self {
        ArcStr(Arc::from(""))
    }
}

impl Display for ArcStr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<T: Into<Arc<str>>> From<T> for ArcStr {
    fn from(value: T) -> Self {
        ArcStr(value.into())
    }
}

impl From<ArcStr> for String {
    fn from(value: ArcStr) -> Self {
        value.to_string()
    }
}

impl From<&ArcStr> for String {
    fn from(value: &ArcStr) -> Self {
        value.clone().into()
    }
}

impl Deref for ArcStr {
    type Target = Arc<str>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<str> for ArcStr {
    #[inline]
    fn borrow(&self) -> &str {
        self.0.borrow()
    }
}

impl<T> AsRef<T> for ArcStr
where
    T: ?Sized,
    <ArcStr as Deref>::Target: AsRef<T>,
{
    fn as_ref(&self) -> &T {
        self.deref().as_ref()
    }
}

impl<T: Borrow<str> + ?Sized> PartialEq<T> for ArcStr {
    fn eq(&self, other: &T) -> bool {
        <ArcStr as Borrow<str>>::borrow(self).eq(other.borrow())
    }
}

impl<T: Borrow<str>> PartialOrd<T> for ArcStr {
    fn partial_cmp(&self, other: &T) -> Option<Ordering> {
        <ArcStr as Borrow<str>>::borrow(self).partial_cmp(other.borrow())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn compares_with_plain_strings() {
        let s = ArcStr::from("zouk");
        assert_eq!(s, "zouk");
        assert!(s < ArcStr::from("zz"));
    }
}
