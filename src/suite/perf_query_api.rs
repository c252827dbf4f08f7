//! Basic `GL_INTEL_performance_query` infrastructure: enumeration of queries and counters,
//! string handling and error conditions. Nothing is ever measured.

use std::os::raw::c_void;
use std::ptr;

use tracing::warn;

use crate::backend::Facade;
use crate::config::TestConfig;
use crate::error::GlError;
use crate::gl;
use crate::harness::Harness;
use crate::perf_query::{self, PerfQuery};
use crate::requirements::Requirements;
use crate::result::TestResult;

use super::ConformanceTest;

/// Never returned by `glCreatePerfQueryINTEL` before any query object is created.
const INVALID_HANDLE: gl::types::GLuint = 777;

const INVALID_NAME: &str = "We assume this is an invalid name of a query";

/// Filler that a driver writing into a buffer it shouldn't touch would overwrite.
const FILLER: u8 = b'`';

fn nul_terminated(name: &str) -> Vec<u8> {
    let mut bytes = name.as_bytes().to_vec();
    bytes.push(0);
    bytes
}

/// Only the first byte of a one-byte buffer may change, to the terminator.
fn is_terminated_single_byte(buffer: &[u8; 3]) -> bool {
    *buffer == [0, FILLER, FILLER]
}

fn first_query_null_queryid_pointer(harness: &Harness) -> bool {
    {
        let ctxt = harness.get_context().make_current();
        unsafe { ctxt.gl.GetFirstPerfQueryIdINTEL(ptr::null_mut()) };
    }
    harness.check_error(GlError::InvalidValue)
}

fn next_query_null_nextqueryid_pointer(harness: &Harness, valid_query: u32) -> bool {
    {
        let ctxt = harness.get_context().make_current();
        unsafe { ctxt.gl.GetNextPerfQueryIdINTEL(valid_query, ptr::null_mut()) };
    }
    harness.check_error(GlError::InvalidValue)
}

fn next_query_invalid_queryid(harness: &Harness, invalid_query: u32) -> bool {
    let mut next = 0;
    {
        let ctxt = harness.get_context().make_current();
        unsafe { ctxt.gl.GetNextPerfQueryIdINTEL(invalid_query, &mut next) };
    }
    harness.check_error(GlError::InvalidValue)
}

/// Must not write through the null pointer. Whether an error is raised is unspecified, so
/// nothing is reported and the error queue is emptied.
fn get_query_by_name_null_queryid_pointer(harness: &Harness, valid_name: &str) {
    let mut name = nul_terminated(valid_name);
    {
        let ctxt = harness.get_context().make_current();
        unsafe {
            ctxt.gl.GetPerfQueryIdByNameINTEL(name.as_mut_ptr() as *mut gl::types::GLchar,
                                              ptr::null_mut());
        }
    }
    harness.get_context().drain_errors();
}

fn get_query_by_name_null_name_pointer(harness: &Harness) -> bool {
    let mut query = 0;
    {
        let ctxt = harness.get_context().make_current();
        unsafe { ctxt.gl.GetPerfQueryIdByNameINTEL(ptr::null_mut(), &mut query) };
    }
    harness.check_error(GlError::InvalidValue)
}

fn get_query_by_name_invalid_name(harness: &Harness, invalid_name: &str) -> bool {
    let mut name = nul_terminated(invalid_name);
    let mut query = 0;
    {
        let ctxt = harness.get_context().make_current();
        unsafe {
            ctxt.gl.GetPerfQueryIdByNameINTEL(name.as_mut_ptr() as *mut gl::types::GLchar,
                                              &mut query);
        }
    }
    harness.check_error(GlError::InvalidValue)
}

fn get_perf_query_info_invalid_queryid(harness: &Harness, invalid_query: u32) -> bool {
    perf_query::query_info(harness, invalid_query);
    harness.check_error(GlError::InvalidValue)
}

fn get_perf_query_info_null_pointers(harness: &Harness, valid_query: u32) -> bool {
    {
        let ctxt = harness.get_context().make_current();
        unsafe {
            ctxt.gl.GetPerfQueryInfoINTEL(valid_query, 0, ptr::null_mut(), ptr::null_mut(),
                                          ptr::null_mut(), ptr::null_mut(), ptr::null_mut());
        }
    }
    harness.check_error(GlError::NoError)
}

fn get_perf_query_info_single_character_buffer(harness: &Harness, valid_query: u32) -> bool {
    let mut name = [FILLER; 3];
    {
        let ctxt = harness.get_context().make_current();
        unsafe {
            ctxt.gl.GetPerfQueryInfoINTEL(valid_query, 1,
                                          name.as_mut_ptr() as *mut gl::types::GLchar,
                                          ptr::null_mut(), ptr::null_mut(), ptr::null_mut(),
                                          ptr::null_mut());
        }
    }

    let pass = harness.check_error(GlError::NoError);
    is_terminated_single_byte(&name) && pass
}

fn get_perf_counter_info_invalid_queryid(harness: &Harness, invalid_query: u32) -> bool {
    // 1 is always a valid counter id
    perf_query::counter_info(harness, invalid_query, 1);
    harness.check_error(GlError::InvalidValue)
}

fn get_perf_counter_info_invalid_counterid(harness: &Harness, valid_query: u32,
                                           invalid_counter: u32) -> bool
{
    perf_query::counter_info(harness, valid_query, invalid_counter);
    harness.check_error(GlError::InvalidValue)
}

fn get_perf_counter_info_null_pointers(harness: &Harness, valid_query: u32,
                                       valid_counter: u32) -> bool
{
    {
        let ctxt = harness.get_context().make_current();
        unsafe {
            ctxt.gl.GetPerfCounterInfoINTEL(valid_query, valid_counter, 0, ptr::null_mut(),
                                            0, ptr::null_mut(), ptr::null_mut(),
                                            ptr::null_mut(), ptr::null_mut(), ptr::null_mut(),
                                            ptr::null_mut());
        }
    }
    harness.check_error(GlError::NoError)
}

fn get_perf_counter_info_single_character_buffer(harness: &Harness, valid_query: u32,
                                                 valid_counter: u32) -> bool
{
    let mut name = [FILLER; 3];
    let mut desc = [FILLER; 3];
    {
        let ctxt = harness.get_context().make_current();
        unsafe {
            ctxt.gl.GetPerfCounterInfoINTEL(valid_query, valid_counter,
                                            1, name.as_mut_ptr() as *mut gl::types::GLchar,
                                            1, desc.as_mut_ptr() as *mut gl::types::GLchar,
                                            ptr::null_mut(), ptr::null_mut(), ptr::null_mut(),
                                            ptr::null_mut(), ptr::null_mut());
        }
    }

    let pass = harness.check_error(GlError::NoError);
    is_terminated_single_byte(&name) && is_terminated_single_byte(&desc) && pass
}

/// Every query must be either single-context or global.
fn query_info(harness: &Harness, queries: &[u32]) -> bool {
    for &query in queries {
        let info = perf_query::query_info(harness, query);
        if !perf_query::is_valid_caps_mask(info.caps_mask) {
            warn!("Query {} has an invalid capability mask: {:x}", query, info.caps_mask);
            return false;
        }
    }

    true
}

/// Every counter of every query must have a valid type and data type.
fn counter_info(harness: &Harness, queries: &[u32]) -> bool {
    for &query in queries {
        if !harness.automatic() {
            let info = perf_query::query_info(harness, query);
            harness.inform(format_args!("Query {} [{}]:", query, info.name));
        }

        for counter in perf_query::counter_ids(harness, query) {
            let info = perf_query::counter_info(harness, query, counter);

            if !harness.automatic() {
                harness.inform(format_args!(" Counter {} [{}]: {}", counter, info.name,
                                            info.description));
            }

            if info.data_type().is_none() {
                warn!("Query {}/Counter {} has an invalid datatype: {:x}", query, counter,
                      info.data_type);
                return false;
            }

            if info.counter_type().is_none() {
                warn!("Query {}/Counter {} has an invalid type: {:x}", query, counter,
                      info.counter_type);
                return false;
            }
        }
    }

    true
}

fn begin_invalid_query_handle(harness: &Harness) -> bool {
    {
        let ctxt = harness.get_context().make_current();
        unsafe { ctxt.gl.BeginPerfQueryINTEL(INVALID_HANDLE) };
    }
    harness.check_error(GlError::InvalidValue)
}

/// Only `GL_INVALID_OPERATION` is defined for this case, `GL_INVALID_VALUE` is accepted too.
fn end_invalid_query_handle(harness: &Harness) -> bool {
    {
        let ctxt = harness.get_context().make_current();
        unsafe { ctxt.gl.EndPerfQueryINTEL(INVALID_HANDLE) };
    }

    match harness.get_error() {
        GlError::InvalidValue | GlError::InvalidOperation => true,
        err => {
            warn!("Unexpected GL error: {}", err);
            false
        },
    }
}

fn create_perf_query_invalid_query(harness: &Harness, invalid_query: u32) -> bool {
    match PerfQuery::create(harness, invalid_query) {
        Err(GlError::InvalidValue) => true,
        Err(err) => {
            warn!("Unexpected GL error: {} 0x{:x}", err, err.to_glenum());
            false
        },
        Ok(_) => {
            warn!("Creating a query object for query {} succeeded", invalid_query);
            false
        },
    }
}

fn create_perf_query_null_handle_pointer(harness: &Harness, valid_query: u32) -> bool {
    {
        let ctxt = harness.get_context().make_current();
        unsafe { ctxt.gl.CreatePerfQueryINTEL(valid_query, ptr::null_mut()) };
    }
    harness.check_error(GlError::InvalidValue)
}

fn delete_perf_query_invalid_handle(harness: &Harness) -> bool {
    {
        let ctxt = harness.get_context().make_current();
        unsafe { ctxt.gl.DeletePerfQueryINTEL(INVALID_HANDLE) };
    }
    harness.check_error(GlError::InvalidValue)
}

fn get_query_data_invalid_query_handle(harness: &Harness) -> bool {
    let mut data = [0u8; 1024];
    let mut bytes_written = 0;
    {
        let ctxt = harness.get_context().make_current();
        unsafe {
            ctxt.gl.GetPerfQueryDataINTEL(INVALID_HANDLE, gl::PERFQUERY_DONOT_FLUSH_INTEL,
                                          data.len() as gl::types::GLsizei,
                                          data.as_mut_ptr() as *mut c_void, &mut bytes_written);
        }
    }
    harness.check_error(GlError::InvalidValue)
}

/// Creates a query object for the first query, or logs why it can't.
fn create_first(harness: &Harness) -> Option<PerfQuery> {
    let query = perf_query::query_ids(harness).first().copied()?;

    match PerfQuery::create(harness, query) {
        Ok(perf) => Some(perf),
        Err(err) => {
            warn!("Creating a query object for query {} raised {}", query, err);
            None
        },
    }
}

fn get_query_data_null_data_pointer(harness: &Harness) -> bool {
    let perf = match create_first(harness) {
        Some(perf) => perf,
        None => return false,
    };

    let mut bytes_written = 0;
    {
        let ctxt = harness.get_context().make_current();
        unsafe {
            ctxt.gl.GetPerfQueryDataINTEL(perf.handle(), gl::PERFQUERY_DONOT_FLUSH_INTEL, 128,
                                          ptr::null_mut(), &mut bytes_written);
        }
    }
    harness.check_error(GlError::InvalidValue)
}

fn get_query_data_null_byteswritten_pointer(harness: &Harness) -> bool {
    let perf = match create_first(harness) {
        Some(perf) => perf,
        None => return false,
    };

    let mut data = [0u8; 1024];
    {
        let ctxt = harness.get_context().make_current();
        unsafe {
            ctxt.gl.GetPerfQueryDataINTEL(perf.handle(), gl::PERFQUERY_DONOT_FLUSH_INTEL,
                                          data.len() as gl::types::GLsizei,
                                          data.as_mut_ptr() as *mut c_void, ptr::null_mut());
        }
    }
    harness.check_error(GlError::InvalidValue)
}

/// A query object that was never begun has no data.
fn initial_state(harness: &Harness) -> bool {
    let perf = match create_first(harness) {
        Some(perf) => perf,
        None => return false,
    };

    let mut data = [FILLER; 1024];
    let bytes_written = perf.data_into(gl::PERFQUERY_DONOT_FLUSH_INTEL, &mut data);
    let pass = harness.check_error(GlError::NoError);

    bytes_written == 0 && data[0] == FILLER && pass
}

/// Ending a query object that isn't started raises `GL_INVALID_OPERATION`.
fn end_without_begin(harness: &Harness) -> bool {
    let perf = match create_first(harness) {
        Some(perf) => perf,
        None => return false,
    };

    perf.end();
    harness.check_error(GlError::InvalidOperation)
}

/// Beginning the same query object twice raises `GL_INVALID_OPERATION`.
///
/// Which queries can't be collected at the same time is implementation-defined, but the same
/// query object surely can't be started twice. If it can't even be started once, nothing is
/// reported.
fn double_begin(harness: &Harness) -> Option<bool> {
    let perf = match create_first(harness) {
        Some(perf) => perf,
        None => return Some(false),
    };

    perf.begin();
    match harness.get_error() {
        GlError::NoError => (),
        GlError::InvalidOperation => {
            harness.inform(format_args!("The query object couldn't be started"));
            return None;
        },
        err => {
            warn!("Unexpected GL error: {}", err);
            return Some(false);
        },
    }

    perf.begin();
    Some(harness.check_error(GlError::InvalidOperation))
}

/// `intel_performance_query-api`
pub struct PerfQueryApi;

impl ConformanceTest for PerfQueryApi {
    fn name(&self) -> &'static str {
        "intel_performance_query-api"
    }

    fn config(&self) -> TestConfig {
        TestConfig::compat(3, 0)
    }

    fn requirements(&self) -> Requirements {
        Requirements::new().extension("GL_INTEL_performance_query")
    }

    fn run(&self, harness: &mut Harness) -> TestResult {
        harness.subtest("test_first_query_null_queryid_pointer",
                        |h| first_query_null_queryid_pointer(h));

        let queries = perf_query::query_ids(&*harness);
        let valid_query = match queries.first() {
            Some(&query) => query,
            None => return harness.merged_result(),
        };
        let invalid_query = perf_query::find_invalid_id(&queries);

        harness.subtest("test_next_query_null_nextqueryid_pointer",
                        |h| next_query_null_nextqueryid_pointer(h, valid_query));
        harness.subtest("test_next_query_invalid_queryid",
                        |h| next_query_invalid_queryid(h, invalid_query));

        let valid_name = perf_query::query_info(&*harness, valid_query).name;

        get_query_by_name_null_queryid_pointer(harness, &valid_name);
        harness.subtest("test_get_query_by_name_null_name_pointer",
                        |h| get_query_by_name_null_name_pointer(h));
        harness.subtest("test_get_query_by_name_invalid_name",
                        |h| get_query_by_name_invalid_name(h, INVALID_NAME));
        harness.subtest("test_get_perf_query_info_invalid_queryid",
                        |h| get_perf_query_info_invalid_queryid(h, invalid_query));
        harness.subtest("test_get_perf_query_info_null_pointers",
                        |h| get_perf_query_info_null_pointers(h, valid_query));
        harness.subtest("test_get_perf_query_info_single_character_buffer",
                        |h| get_perf_query_info_single_character_buffer(h, valid_query));
        harness.subtest("test_get_perf_counter_info_invalid_queryid",
                        |h| get_perf_counter_info_invalid_queryid(h, invalid_query));

        let counters = perf_query::counter_ids(&*harness, valid_query);
        let valid_counter = match counters.first() {
            Some(&counter) => counter,
            None => return harness.merged_result(),
        };
        let invalid_counter = perf_query::find_invalid_id(&counters);

        harness.subtest("test_get_perf_counter_info_invalid_counterid",
                        |h| get_perf_counter_info_invalid_counterid(h, valid_query,
                                                                    invalid_counter));
        harness.subtest("test_get_perf_counter_info_null_pointers",
                        |h| get_perf_counter_info_null_pointers(h, valid_query, valid_counter));
        harness.subtest("test_get_perf_counter_info_single_character_buffer",
                        |h| get_perf_counter_info_single_character_buffer(h, valid_query,
                                                                          valid_counter));
        harness.subtest("test_query_info", |h| query_info(h, &queries));
        harness.subtest("test_counter_info", |h| counter_info(h, &queries));
        harness.subtest("test_begin_invalid_query_handle", |h| begin_invalid_query_handle(h));
        harness.subtest("test_end_invalid_query_handle", |h| end_invalid_query_handle(h));
        harness.subtest("test_create_perf_query_invalid_query",
                        |h| create_perf_query_invalid_query(h, invalid_query));
        harness.subtest("test_create_perf_query_null_handle_pointer",
                        |h| create_perf_query_null_handle_pointer(h, valid_query));
        harness.subtest("test_delete_perf_query_invalid_handle",
                        |h| delete_perf_query_invalid_handle(h));
        harness.subtest("test_get_query_data_invalid_query_handle",
                        |h| get_query_data_invalid_query_handle(h));
        harness.subtest("test_get_query_data_null_data_pointer",
                        |h| get_query_data_null_data_pointer(h));
        harness.subtest("test_get_query_data_null_byteswritten_pointer",
                        |h| get_query_data_null_byteswritten_pointer(h));
        harness.subtest("test_initial_state", |h| initial_state(h));
        harness.subtest("test_end_without_begin", |h| end_without_begin(h));
        // skipped without a report when the query can't be started at all
        harness.subtest("test_double_begin", |h| double_begin(h));

        harness.merged_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perf_query::{DESC_LENGTH, NAME_LENGTH};

    #[test]
    fn single_byte_buffer_check() {
        assert!(is_terminated_single_byte(&[0, b'`', b'`']));
        assert!(!is_terminated_single_byte(&[b'`', b'`', b'`']));
        assert!(!is_terminated_single_byte(&[0, 0, b'`']));
    }

    #[test]
    fn names_are_terminated() {
        assert_eq!(nul_terminated("abc"), b"abc\0");
        assert_eq!(nul_terminated(""), b"\0");
    }

    #[test]
    fn name_buffers_fit_the_minimum_limits() {
        assert!(NAME_LENGTH >= 256);
        assert!(DESC_LENGTH >= 1024);
    }
}
