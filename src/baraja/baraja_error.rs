use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BarajaError {
    #[error("Número {0} no válido. Debe ser un entero entre 1 y 12.")]
    NumeroNoValido(u8),

    #[error("Palo no válido: {0}")]
    PaloNoValido(char),

    #[error("Código de carta no válido: {0}")]
    CodigoNoValido(String),
}
