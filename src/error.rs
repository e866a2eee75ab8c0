#[cfg(target_os = "espidf")]
use esp_idf_sys::EspError;

#[derive(Debug)]
pub enum Error {
    #[cfg(target_os = "espidf")]
    EspSys(EspError),
    Read(String),
    Calibration(String),
    InvalidThresholds(String),
    NoSamples,
    WrongPin { expected: u8, found: i32 },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(target_os = "espidf")]
            Error::EspSys(e) => write!(f, "ESP system error: {:?}", e),
            Error::Read(e) => write!(f, "ADC read failed: {}", e),
            Error::Calibration(e) => write!(f, "Calibration unavailable: {}", e),
            Error::InvalidThresholds(e) => write!(f, "Invalid thresholds: {}", e),
            Error::NoSamples => write!(f, "Every read in the batch failed"),
            Error::WrongPin { expected, found } => {
                write!(f, "Profile expects GPIO{} but GPIO{} was given", expected, found)
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(target_os = "espidf")]
impl From<EspError> for Error {
    fn from(e: EspError) -> Self {
        Error::EspSys(e)
    }
}
