
/// Everything collected from the attributes of one field.
#[derive(Debug, Clone)]
pub enum FieldExtra {
    /// `#[field(name = "col[,primary_key]")]`
    Name(String),
    /// `#[field(keyword = "op[,altColumn]")]`
    Keyword(String),
    /// `#[field(column = "alt")]`
    Column(String),
    PrimaryKey,
    Exist(bool),
    Flatten,
    /// `#[serde(rename = "...")]`
    Rename(String),
}

#[derive(Debug, Clone)]
pub enum StructExtra {
    Table(String),
}

/// A field after its attributes have been resolved.
#[derive(Debug, Clone)]
pub struct FieldInformation {
    pub field: syn::Field,
    pub ident: syn::Ident,
    pub column: String,
    pub keyword: String,
    pub compare_column: String,
    pub primary_key: bool,
    pub exist: bool,
    pub flatten: bool,
}
