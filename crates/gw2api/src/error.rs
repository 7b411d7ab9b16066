use miette::Diagnostic;
use thiserror::Error;

/// Everything that can go wrong while turning a wire contract into a domain entity.
///
/// An unrecognized discriminator is not one of them, it resolves to the family's unknown target.
#[derive(Diagnostic, Debug, Error)]
pub enum ConversionError {
    #[error("{family}: expected a json object, found {found}")]
    #[diagnostic(code(conversion::not_an_object))]
    NotAnObject {
        family: &'static str,
        found: &'static str,
    },
    #[error(
        "{family}: contract has no `{key}` discriminator. upstream error: {}",
        .upstream.as_deref().unwrap_or("<none>")
    )]
    #[diagnostic(
        code(conversion::missing_discriminator),
        help("the api usually answers with an error payload instead of a contract when this happens")
    )]
    MissingDiscriminator {
        family: &'static str,
        key: &'static str,
        /// the `text` (or `error`) field of the payload, if the api sent one
        upstream: Option<String>,
    },
    #[error("{family}: failed to decode fields into {target}")]
    #[diagnostic(code(conversion::decode))]
    Decode {
        family: &'static str,
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid numeric text {text:?} for {target}")]
    #[diagnostic(code(conversion::invalid_number))]
    InvalidNumber { text: String, target: &'static str },
    #[error("invalid identifier {text:?}")]
    #[diagnostic(code(conversion::invalid_identifier))]
    InvalidIdentifier {
        text: String,
        #[source]
        source: uuid::Error,
    },
}

pub type Result<T, E = ConversionError> = std::result::Result<T, E>;
