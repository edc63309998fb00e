// Configuration-store backends
//
// Windows reads the real registry; every other platform has no registry and
// reports all values as absent.
use std::sync::Arc;

use capscan_core::domain::{RegistryQuery, RegistryValue};
use capscan_core::port::{ProbeError, RegistryStore};

#[cfg(windows)]
pub use self::windows_registry::WindowsRegistry;

/// Registry backend for the current platform
pub fn native_registry() -> Arc<dyn RegistryStore> {
    #[cfg(windows)]
    {
        Arc::new(WindowsRegistry)
    }

    #[cfg(not(windows))]
    {
        Arc::new(EmptyRegistry)
    }
}

/// Backend for hosts without a registry
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyRegistry;

impl RegistryStore for EmptyRegistry {
    fn is_64bit_os(&self) -> bool {
        cfg!(target_pointer_width = "64")
    }

    fn read_value(&self, _query: &RegistryQuery) -> Result<Option<RegistryValue>, ProbeError> {
        Ok(None)
    }
}

#[cfg(windows)]
mod windows_registry {
    use std::iter::once;
    use tracing::debug;
    use windows::core::PCWSTR;
    use windows::Win32::Foundation::{
        BOOL, ERROR_ACCESS_DENIED, ERROR_FILE_NOT_FOUND, ERROR_MORE_DATA, ERROR_PATH_NOT_FOUND,
        ERROR_SUCCESS, WIN32_ERROR,
    };
    use windows::Win32::System::Registry::{
        RegCloseKey, RegOpenKeyExW, RegQueryValueExW, HKEY, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE,
        KEY_READ, KEY_WOW64_32KEY, KEY_WOW64_64KEY, REG_DWORD, REG_EXPAND_SZ, REG_MULTI_SZ,
        REG_QWORD, REG_SAM_FLAGS, REG_SZ, REG_VALUE_TYPE,
    };
    use windows::Win32::System::Threading::{GetCurrentProcess, IsWow64Process};

    use capscan_core::domain::{Hive, RegistryQuery, RegistryValue, RegistryView};
    use capscan_core::port::{ProbeError, RegistryStore};

    /// Value buffers can grow between the size query and the read
    const MAX_READ_ATTEMPTS: usize = 3;

    /// Win32 registry backend
    #[derive(Debug, Default, Clone, Copy)]
    pub struct WindowsRegistry;

    /// Open subkey, closed on drop on every exit path
    struct OpenKey(HKEY);

    impl Drop for OpenKey {
        fn drop(&mut self) {
            // SAFETY: self.0 came from a successful RegOpenKeyExW and is closed once
            unsafe {
                let _ = RegCloseKey(self.0);
            }
        }
    }

    fn wide(s: &str) -> Vec<u16> {
        s.encode_utf16().chain(once(0)).collect()
    }

    fn status_error(status: WIN32_ERROR, target: &str) -> ProbeError {
        if status == ERROR_ACCESS_DENIED {
            ProbeError::AccessDenied(target.to_string())
        } else {
            ProbeError::Os {
                code: i64::from(status.0),
                target: target.to_string(),
            }
        }
    }

    fn is_missing(status: WIN32_ERROR) -> bool {
        status == ERROR_FILE_NOT_FOUND || status == ERROR_PATH_NOT_FOUND
    }

    impl WindowsRegistry {
        fn open(query: &RegistryQuery) -> Result<Option<OpenKey>, ProbeError> {
            let root = match query.hive {
                Hive::CurrentUser => HKEY_CURRENT_USER,
                Hive::LocalMachine => HKEY_LOCAL_MACHINE,
            };
            let view_flag = match query.view {
                RegistryView::Default => REG_SAM_FLAGS(0),
                RegistryView::Registry64 => KEY_WOW64_64KEY,
                RegistryView::Registry32 => KEY_WOW64_32KEY,
            };
            let key_path = wide(&query.key_path);
            let mut hkey = HKEY::default();

            // SAFETY: key_path is NUL-terminated and outlives the call
            let status = unsafe {
                RegOpenKeyExW(
                    root,
                    PCWSTR(key_path.as_ptr()),
                    0,
                    KEY_READ | view_flag,
                    &mut hkey,
                )
            };

            if status == ERROR_SUCCESS {
                Ok(Some(OpenKey(hkey)))
            } else if is_missing(status) {
                Ok(None)
            } else {
                Err(status_error(status, &query.key_path))
            }
        }

        fn query_raw(
            key: &OpenKey,
            query: &RegistryQuery,
        ) -> Result<Option<(REG_VALUE_TYPE, Vec<u8>)>, ProbeError> {
            let value_name = wide(&query.value_name);
            let mut kind = REG_VALUE_TYPE::default();
            let mut size: u32 = 0;

            // SAFETY: size query only; no data buffer
            let status = unsafe {
                RegQueryValueExW(
                    key.0,
                    PCWSTR(value_name.as_ptr()),
                    None,
                    Some(&mut kind as *mut REG_VALUE_TYPE),
                    None,
                    Some(&mut size as *mut u32),
                )
            };
            if is_missing(status) {
                return Ok(None);
            }
            if status != ERROR_SUCCESS {
                return Err(status_error(status, &query.value_name));
            }

            let mut data = vec![0u8; size as usize];
            for _ in 0..MAX_READ_ATTEMPTS {
                let mut len = data.len() as u32;
                // SAFETY: data has room for len bytes
                let status = unsafe {
                    RegQueryValueExW(
                        key.0,
                        PCWSTR(value_name.as_ptr()),
                        None,
                        Some(&mut kind as *mut REG_VALUE_TYPE),
                        Some(data.as_mut_ptr()),
                        Some(&mut len as *mut u32),
                    )
                };

                if status == ERROR_MORE_DATA {
                    data.resize(len as usize, 0);
                    continue;
                }
                if is_missing(status) {
                    return Ok(None);
                }
                if status != ERROR_SUCCESS {
                    return Err(status_error(status, &query.value_name));
                }

                data.truncate(len as usize);
                return Ok(Some((kind, data)));
            }

            Err(status_error(ERROR_MORE_DATA, &query.value_name))
        }
    }

    fn utf16(bytes: &[u8]) -> Vec<u16> {
        bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect()
    }

    fn decode(kind: REG_VALUE_TYPE, bytes: Vec<u8>) -> RegistryValue {
        if kind == REG_SZ || kind == REG_EXPAND_SZ {
            let units = utf16(&bytes);
            let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
            let text = String::from_utf16_lossy(&units[..end]);
            if kind == REG_SZ {
                RegistryValue::String(text)
            } else {
                RegistryValue::ExpandString(text)
            }
        } else if kind == REG_MULTI_SZ {
            let units = utf16(&bytes);
            RegistryValue::MultiString(
                units
                    .split(|&u| u == 0)
                    .filter(|s| !s.is_empty())
                    .map(String::from_utf16_lossy)
                    .collect(),
            )
        } else if kind == REG_DWORD && bytes.len() >= 4 {
            RegistryValue::Dword(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        } else if kind == REG_QWORD && bytes.len() >= 8 {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&bytes[..8]);
            RegistryValue::Qword(u64::from_le_bytes(raw))
        } else {
            RegistryValue::Binary(bytes)
        }
    }

    impl RegistryStore for WindowsRegistry {
        fn is_64bit_os(&self) -> bool {
            if cfg!(target_pointer_width = "64") {
                return true;
            }

            // 32-bit process: 64-bit OS iff running under WOW64
            let mut wow64 = BOOL(0);
            // SAFETY: pseudo-handle of the current process, valid for the call
            let ok = unsafe { IsWow64Process(GetCurrentProcess(), &mut wow64) }.is_ok();
            ok && wow64.as_bool()
        }

        fn read_value(&self, query: &RegistryQuery) -> Result<Option<RegistryValue>, ProbeError> {
            let Some(key) = Self::open(query)? else {
                debug!(key = %query.key_path, view = %query.view, "Registry key not found");
                return Ok(None);
            };

            let value = Self::query_raw(&key, query)?.map(|(kind, bytes)| decode(kind, bytes));
            Ok(value)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_missing_key_is_absent() {
            let query = RegistryQuery::new(
                Hive::CurrentUser,
                RegistryView::Default,
                r"SOFTWARE\capscan-test-missing-key",
                "Path",
            );
            assert_eq!(WindowsRegistry.read_value(&query), Ok(None));
        }

        #[test]
        fn test_reads_well_known_string() {
            let query = RegistryQuery::new(
                Hive::LocalMachine,
                RegistryView::Default,
                r"SOFTWARE\Microsoft\Windows NT\CurrentVersion",
                "ProductName",
            );
            let value = WindowsRegistry.read_value(&query).unwrap();
            assert!(matches!(value, Some(RegistryValue::String(s)) if !s.is_empty()));
        }

        #[test]
        fn test_decode_string_and_dword() {
            let bytes: Vec<u8> = "C:\\sdk\0"
                .encode_utf16()
                .flat_map(|u| u.to_le_bytes())
                .collect();
            assert_eq!(
                decode(REG_SZ, bytes),
                RegistryValue::String("C:\\sdk".to_string())
            );
            assert_eq!(
                decode(REG_DWORD, 7u32.to_le_bytes().to_vec()),
                RegistryValue::Dword(7)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capscan_core::domain::{Hive, RegistryView};

    #[cfg(not(windows))]
    #[test]
    fn test_native_registry_reports_everything_absent() {
        let registry = native_registry();
        let query = RegistryQuery::new(
            Hive::LocalMachine,
            RegistryView::Registry64,
            r"SOFTWARE\Android SDK Tools",
            "Path",
        );
        assert_eq!(registry.read_value(&query), Ok(None));
    }

    #[test]
    fn test_empty_registry_bitness_follows_target() {
        assert_eq!(
            EmptyRegistry.is_64bit_os(),
            cfg!(target_pointer_width = "64")
        );
    }
}
