use syn::{Attribute, Error, ExprPath, LitStr, Token};

pub const COMPONENT: &str = "component";

pub enum DefaultDefinition {
    Default,
    Expr(ExprPath),
}

pub struct FieldAttributes {
    pub default: Option<DefaultDefinition>,
}

impl TryFrom<&Attribute> for FieldAttributes {
    type Error = Error;

    fn try_from(value: &Attribute) -> Result<Self, Self::Error> {
        let mut default = None;
        value.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                if meta.input.peek(Token![=]) {
                    let value = meta.value()?;
                    let expr: LitStr = value.parse()?;
                    default = Some(DefaultDefinition::Expr(expr.parse()?));
                } else {
                    default = Some(DefaultDefinition::Default);
                }

                Ok(())
            } else {
                Err(meta.error("Unsupported component field attribute!"))
            }
        })?;

        Ok(Self { default })
    }
}

pub struct ComponentAttributes {
    pub is_default: bool,
}

impl TryFrom<&Attribute> for ComponentAttributes {
    type Error = Error;

    fn try_from(value: &Attribute) -> Result<Self, Self::Error> {
        let mut is_default = false;
        value.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                is_default = true;
                Ok(())
            } else {
                Err(meta.error("Unsupported component attribute!"))
            }
        })?;

        Ok(Self { is_default })
    }
}

pub struct ConstructorAttributes {
    pub ignore: bool,
}

impl TryFrom<&Attribute> for ConstructorAttributes {
    type Error = Error;

    fn try_from(value: &Attribute) -> Result<Self, Self::Error> {
        let mut ignore = false;
        value.parse_nested_meta(|meta| {
            if meta.path.is_ident("ignore") {
                ignore = true;
                Ok(())
            } else {
                Err(meta.error("Unsupported component constructor attribute!"))
            }
        })?;

        Ok(Self { ignore })
    }
}

/// Returns the first `#[component]` attribute, parsed.
pub fn extract_attributes<'a, T: TryFrom<&'a Attribute, Error = Error>>(
    attributes: &'a [Attribute],
) -> Result<Option<T>, Error> {
    attributes
        .iter()
        .find(|attribute| attribute.path().is_ident(COMPONENT))
        .map(T::try_from)
        .transpose()
}
