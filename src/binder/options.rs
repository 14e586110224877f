// SPDX-License-Identifier: MIT OR Apache-2.0

/// Options that change how the binder treats a target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinderOptions {
    /// Also bind descriptor members marked non-public.
    pub bind_non_public_properties: bool,
    /// Fail when a node has children that match no member of the target.
    pub error_on_unknown_configuration: bool,
}

impl BinderOptions {
    /// Sets [`bind_non_public_properties`](Self::bind_non_public_properties).
    pub fn with_bind_non_public_properties(mut self, enabled: bool) -> Self {
        self.bind_non_public_properties = enabled;
        self
    }

    /// Sets [`error_on_unknown_configuration`](Self::error_on_unknown_configuration).
    pub fn with_error_on_unknown_configuration(mut self, enabled: bool) -> Self {
        self.error_on_unknown_configuration = enabled;
        self
    }
}
