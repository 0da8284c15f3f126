use ib_set::{Anchor, Error, RegexSet};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
    // RUST_LOG=ib_set=trace cargo run --example basic
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut set = RegexSet::new(Anchor::Unanchored);
    set.add("foo")?;
    set.add("bar")?;
    // Invalid patterns don't take an index
    assert!(set.add("(baz").is_err());
    set.add("baz")?;
    set.compile()?;
    assert_eq!(set.matches("a foo b")?.as_slice(), &[0]);
    assert_eq!(set.matches("bazbar")?.as_slice(), &[1, 2]);

    let mut set = RegexSet::new(Anchor::Both);
    set.add("abc")?;
    set.add("a.*c")?;
    set.compile()?;
    assert_eq!(set.matches("abc")?.as_slice(), &[0, 1]);
    assert!(!set.is_match("xabc")?);

    // The set is frozen after compiling
    assert!(matches!(set.add("x"), Err(Error::AlreadyFinalized)));
    Ok(())
}
