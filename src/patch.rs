use super::*;

/// The result of patching one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patch {
  /// Defects that were found and fixed, in pipeline order.
  pub applied: Vec<Defect>,
  pub changed: bool,
  pub text: String,
}
