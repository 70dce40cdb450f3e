use std::io::Read;

use byteorder::ReadBytesExt;

use crate::consts;
use crate::error::{Error, Result};

pub(crate) fn read_null_terminated_string<R: Read>(
    reader: &mut R,
) -> Result<String> {
    let mut bytes = Vec::<u8>::with_capacity(consts::MAX_STRING_SIZE);
    loop {
        let byte = reader.read_u8().map_err(Error::Read)?;
        if byte == 0 {
            break;
        } else if bytes.len() == consts::MAX_STRING_SIZE {
            return data_format!(
                "String longer than maximum of {} bytes",
                consts::MAX_STRING_SIZE
            );
        }
        bytes.push(byte);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
