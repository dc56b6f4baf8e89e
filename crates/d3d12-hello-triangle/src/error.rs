pub type SampleResult<T, E = SampleReport> = core::result::Result<T, E>;

/// Error type returned by every fallible sample operation.
///
/// Wraps an [`eyre::Report`] so both `eyre` errors and `windows::core::Error`
/// values can be propagated with `?`.
pub struct SampleReport {
    inner: eyre::Report,
}

impl SampleReport {
    pub fn msg(message: impl std::fmt::Display + std::fmt::Debug + Send + Sync + 'static) -> Self {
        Self {
            inner: eyre::Report::msg(message),
        }
    }

    /// Adds a layer of context on top of the wrapped report.
    pub fn wrap_err(
        self,
        context: impl std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner: self.inner.wrap_err(context),
        }
    }

    pub fn into_report(self) -> eyre::Report {
        self.inner
    }
}

impl From<eyre::Report> for SampleReport {
    fn from(report: eyre::Report) -> Self {
        Self { inner: report }
    }
}

impl std::fmt::Display for SampleReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

impl std::fmt::Debug for SampleReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

#[cfg(windows)]
impl From<windows::core::Error> for SampleReport {
    fn from(error: windows::core::Error) -> Self {
        Self {
            inner: eyre::Report::new(WrappedWindowsError::from(error)),
        }
    }
}

/// `windows::core::Error` only implements `std::error::Error` with the `std`
/// feature, which this crate builds without.
#[cfg(windows)]
pub struct WrappedWindowsError {
    inner: windows::core::Error,
}

#[cfg(windows)]
impl WrappedWindowsError {
    pub fn code(&self) -> windows::core::HRESULT {
        self.inner.code()
    }
}

#[cfg(windows)]
impl From<windows::core::Error> for WrappedWindowsError {
    fn from(error: windows::core::Error) -> Self {
        Self { inner: error }
    }
}

#[cfg(windows)]
impl std::error::Error for WrappedWindowsError {}

#[cfg(windows)]
impl std::fmt::Display for WrappedWindowsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:#010x})", self.inner.message(), self.inner.code().0)
    }
}

#[cfg(windows)]
impl std::fmt::Debug for WrappedWindowsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remove_device() -> eyre::Result<()> {
        Err(eyre::eyre!("device removed"))
    }

    fn fails() -> SampleResult<()> {
        remove_device()?;
        Ok(())
    }

    #[test]
    fn eyre_reports_propagate_with_question_mark() {
        let report = fails().unwrap_err();
        assert_eq!(report.to_string(), "device removed");
    }

    #[test]
    fn wrap_err_puts_context_on_top() {
        let report = SampleReport::msg("E_OUTOFMEMORY").wrap_err("creating vertex buffer");
        assert_eq!(report.to_string(), "creating vertex buffer");
        let chain: Vec<String> = report
            .into_report()
            .chain()
            .map(|cause| cause.to_string())
            .collect();
        assert_eq!(chain, vec!["creating vertex buffer", "E_OUTOFMEMORY"]);
    }

    #[cfg(windows)]
    #[test]
    fn windows_errors_keep_their_hresult() {
        use windows::Win32::Foundation::E_FAIL;

        let report: SampleReport = windows::core::Error::from(E_FAIL).into();
        let wrapped = report
            .into_report()
            .downcast::<WrappedWindowsError>()
            .unwrap();
        assert_eq!(wrapped.code(), E_FAIL);
    }
}
