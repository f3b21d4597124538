/// A table-backed type that a repository can page over.
///
/// Pages of an entity are ordered by `id_column()` unless the caller picks
/// another order, so consecutive pages neither overlap nor skip rows.
///
/// # Example
///
/// ```ignore
/// impl Entity for Post {
///     fn table_name() -> &'static str { "posts" }
///     fn id_column() -> &'static str { "id" }
///     fn columns() -> &'static [&'static str] { &["id", "author", "title"] }
/// }
/// ```
pub trait Entity: Send + Sync + Unpin + 'static {
    fn table_name() -> &'static str;
    fn id_column() -> &'static str;
    fn columns() -> &'static [&'static str];
}
