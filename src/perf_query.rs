/*!
Helpers around `GL_INTEL_performance_query`.

The extension exposes *queries* (groups of counters, enumerated with
`glGetFirstPerfQueryIdINTEL` / `glGetNextPerfQueryIdINTEL`), *counters* inside a query
(numbered from 1, without holes) and *query objects* created from a query, which can be begun,
ended and read back.

*/
use std::os::raw::c_void;
use std::ptr;
use std::rc::Rc;

use fnv::FnvHashSet;
use tracing::{debug, warn};

use crate::backend::Facade;
use crate::context::Context;
use crate::error::GlError;
use crate::gl;

/// Size of the name buffers given to the driver. The extension guarantees that names fit.
pub const NAME_LENGTH: usize = 256;

/// Size of the description buffers given to the driver.
pub const DESC_LENGTH: usize = 1024;

/// Data type of a counter value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CounterDataType {
    /// `GL_PERFQUERY_COUNTER_DATA_UINT32_INTEL`
    Uint32,
    /// `GL_PERFQUERY_COUNTER_DATA_UINT64_INTEL`
    Uint64,
    /// `GL_PERFQUERY_COUNTER_DATA_FLOAT_INTEL`
    Float,
    /// `GL_PERFQUERY_COUNTER_DATA_DOUBLE_INTEL`
    Double,
    /// `GL_PERFQUERY_COUNTER_DATA_BOOL32_INTEL`
    Bool32,
}

impl CounterDataType {
    /// Returns `None` for values the extension doesn't define.
    pub fn from_glenum(value: gl::types::GLenum) -> Option<CounterDataType> {
        match value {
            gl::PERFQUERY_COUNTER_DATA_UINT32_INTEL => Some(CounterDataType::Uint32),
            gl::PERFQUERY_COUNTER_DATA_UINT64_INTEL => Some(CounterDataType::Uint64),
            gl::PERFQUERY_COUNTER_DATA_FLOAT_INTEL => Some(CounterDataType::Float),
            gl::PERFQUERY_COUNTER_DATA_DOUBLE_INTEL => Some(CounterDataType::Double),
            gl::PERFQUERY_COUNTER_DATA_BOOL32_INTEL => Some(CounterDataType::Bool32),
            _ => None,
        }
    }

    /// Size in bytes of one value.
    pub fn value_size(self) -> u32 {
        match self {
            CounterDataType::Uint32 | CounterDataType::Float | CounterDataType::Bool32 => 4,
            CounterDataType::Uint64 | CounterDataType::Double => 8,
        }
    }

    /// Formats the value stored at the beginning of `bytes`, `None` if it is too short.
    pub fn format_value(self, bytes: &[u8]) -> Option<String> {
        let bytes = bytes.get(.. self.value_size() as usize)?;

        Some(match self {
            CounterDataType::Uint32 | CounterDataType::Bool32 =>
                bytemuck::pod_read_unaligned::<u32>(bytes).to_string(),
            CounterDataType::Uint64 => bytemuck::pod_read_unaligned::<u64>(bytes).to_string(),
            CounterDataType::Float =>
                format!("{:.6}", bytemuck::pod_read_unaligned::<f32>(bytes)),
            CounterDataType::Double =>
                format!("{:.6}", bytemuck::pod_read_unaligned::<f64>(bytes)),
        })
    }
}

/// Size in bytes of a value of the raw `datatype`, 0 if it is not a valid data type.
pub fn value_size(datatype: gl::types::GLenum) -> u32 {
    CounterDataType::from_glenum(datatype).map_or(0, CounterDataType::value_size)
}

/// What a counter measures.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CounterType {
    /// `GL_PERFQUERY_COUNTER_EVENT_INTEL`
    Event,
    /// `GL_PERFQUERY_COUNTER_DURATION_NORM_INTEL`
    DurationNorm,
    /// `GL_PERFQUERY_COUNTER_DURATION_RAW_INTEL`
    DurationRaw,
    /// `GL_PERFQUERY_COUNTER_THROUGHPUT_INTEL`
    Throughput,
    /// `GL_PERFQUERY_COUNTER_RAW_INTEL`
    Raw,
    /// `GL_PERFQUERY_COUNTER_TIMESTAMP_INTEL`
    Timestamp,
}

impl CounterType {
    /// Returns `None` for values the extension doesn't define.
    pub fn from_glenum(value: gl::types::GLenum) -> Option<CounterType> {
        match value {
            gl::PERFQUERY_COUNTER_EVENT_INTEL => Some(CounterType::Event),
            gl::PERFQUERY_COUNTER_DURATION_NORM_INTEL => Some(CounterType::DurationNorm),
            gl::PERFQUERY_COUNTER_DURATION_RAW_INTEL => Some(CounterType::DurationRaw),
            gl::PERFQUERY_COUNTER_THROUGHPUT_INTEL => Some(CounterType::Throughput),
            gl::PERFQUERY_COUNTER_RAW_INTEL => Some(CounterType::Raw),
            gl::PERFQUERY_COUNTER_TIMESTAMP_INTEL => Some(CounterType::Timestamp),
            _ => None,
        }
    }
}

/// A query must be either single-context or global, nothing else.
#[inline]
pub fn is_valid_caps_mask(mask: gl::types::GLuint) -> bool {
    mask == gl::PERFQUERY_SINGLE_CONTEXT_INTEL || mask == gl::PERFQUERY_GLOBAL_CONTEXT_INTEL
}

/// Returns an id that isn't in `ids`.
///
/// Implementations tend to use small consecutive integers, so the search starts at
/// `u32::MAX` and walks down.
pub fn find_invalid_id(ids: &[u32]) -> u32 {
    let ids: FnvHashSet<u32> = ids.iter().cloned().collect();

    let mut candidate = u32::MAX;
    while ids.contains(&candidate) {
        candidate = candidate.wrapping_sub(1);
    }

    candidate
}

/// Turns a nul-terminated buffer filled by the driver into a string.
pub fn string_from_buffer(buffer: &[u8]) -> String {
    let end = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf8_lossy(&buffer[.. end]).into_owned()
}

/// Enumerates the ids of every query.
pub fn query_ids<F: ?Sized>(facade: &F) -> Vec<u32> where F: Facade {
    let ctxt = facade.get_context().make_current();

    let mut ids = Vec::new();
    let mut id = 0;
    unsafe {
        ctxt.gl.GetFirstPerfQueryIdINTEL(&mut id);
        while id != 0 {
            if ids.contains(&id) {
                warn!("query id {} is enumerated twice", id);
                break;
            }

            ids.push(id);
            ctxt.gl.GetNextPerfQueryIdINTEL(id, &mut id);
        }
    }

    debug!("{} performance queries", ids.len());
    ids
}

/// Number of counters of a query.
pub fn counter_count<F: ?Sized>(facade: &F, query: u32) -> u32 where F: Facade {
    let ctxt = facade.get_context().make_current();

    let mut count = 0;
    unsafe {
        ctxt.gl.GetPerfQueryInfoINTEL(query, 0, ptr::null_mut(), ptr::null_mut(), &mut count,
                                      ptr::null_mut(), ptr::null_mut());
    }

    count
}

/// Ids of the counters of a query: they start at 1 and are continuous.
pub fn counter_ids<F: ?Sized>(facade: &F, query: u32) -> Vec<u32> where F: Facade {
    (1 ..= counter_count(facade, query)).collect()
}

/// Everything `glGetPerfQueryInfoINTEL` returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryInfo {
    /// Name of the query.
    pub name: String,
    /// Size in bytes of the query's result.
    pub data_size: u32,
    /// Number of counters.
    pub counters: u32,
    /// Maximum number of query objects that can exist at the same time.
    pub instances: u32,
    /// `GL_PERFQUERY_SINGLE_CONTEXT_INTEL` or `GL_PERFQUERY_GLOBAL_CONTEXT_INTEL`.
    pub caps_mask: u32,
}

/// Queries everything about a query.
pub fn query_info<F: ?Sized>(facade: &F, query: u32) -> QueryInfo where F: Facade {
    let ctxt = facade.get_context().make_current();

    let mut name = [0u8; NAME_LENGTH];
    let mut info = QueryInfo::default();
    unsafe {
        ctxt.gl.GetPerfQueryInfoINTEL(query, name.len() as gl::types::GLuint,
                                      name.as_mut_ptr() as *mut gl::types::GLchar,
                                      &mut info.data_size, &mut info.counters,
                                      &mut info.instances, &mut info.caps_mask);
    }

    info.name = string_from_buffer(&name);
    info
}

/// Everything `glGetPerfCounterInfoINTEL` returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterInfo {
    /// Name of the counter.
    pub name: String,
    /// Description of the counter.
    pub description: String,
    /// Offset of the counter's value in the query result.
    pub offset: u32,
    /// Size in bytes of the counter's value.
    pub data_size: u32,
    /// Raw `GL_PERFQUERY_COUNTER_*_INTEL` type.
    pub counter_type: u32,
    /// Raw `GL_PERFQUERY_COUNTER_DATA_*_INTEL` type.
    pub data_type: u32,
    /// Maximum value for raw counters.
    pub raw_max: u64,
}

impl CounterInfo {
    /// Decoded data type, `None` if the driver returned an unknown value.
    #[inline]
    pub fn data_type(&self) -> Option<CounterDataType> {
        CounterDataType::from_glenum(self.data_type)
    }

    /// Decoded counter type, `None` if the driver returned an unknown value.
    #[inline]
    pub fn counter_type(&self) -> Option<CounterType> {
        CounterType::from_glenum(self.counter_type)
    }
}

/// Queries everything about a counter.
pub fn counter_info<F: ?Sized>(facade: &F, query: u32, counter: u32) -> CounterInfo
    where F: Facade
{
    let ctxt = facade.get_context().make_current();

    let mut name = [0u8; NAME_LENGTH];
    let mut desc = [0u8; DESC_LENGTH];
    let mut info = CounterInfo::default();
    unsafe {
        ctxt.gl.GetPerfCounterInfoINTEL(query, counter,
                                        name.len() as gl::types::GLuint,
                                        name.as_mut_ptr() as *mut gl::types::GLchar,
                                        desc.len() as gl::types::GLuint,
                                        desc.as_mut_ptr() as *mut gl::types::GLchar,
                                        &mut info.offset, &mut info.data_size,
                                        &mut info.counter_type, &mut info.data_type,
                                        &mut info.raw_max);
    }

    info.name = string_from_buffer(&name);
    info.description = string_from_buffer(&desc);
    info
}

/// A performance query object.
pub struct PerfQuery {
    context: Rc<Context>,
    handle: gl::types::GLuint,
}

impl Drop for PerfQuery {
    fn drop(&mut self) {
        let ctxt = self.context.make_current();
        unsafe { ctxt.gl.DeletePerfQueryINTEL(self.handle) };
    }
}

impl PerfQuery {
    /// Creates a query object for `query`. The error raised by the driver is returned if
    /// there is one.
    pub fn create<F: ?Sized>(facade: &F, query: u32) -> Result<PerfQuery, GlError>
        where F: Facade
    {
        let mut handle = 0;
        {
            let ctxt = facade.get_context().make_current();
            unsafe { ctxt.gl.CreatePerfQueryINTEL(query, &mut handle) };
        }

        match facade.get_context().get_error() {
            GlError::NoError => Ok(PerfQuery { context: facade.get_context().clone(), handle }),
            err => Err(err),
        }
    }

    /// Returns the handle of the query object.
    #[inline]
    pub fn handle(&self) -> gl::types::GLuint {
        self.handle
    }

    /// Calls `glBeginPerfQueryINTEL`.
    #[inline]
    pub fn begin(&self) {
        let ctxt = self.context.make_current();
        unsafe { ctxt.gl.BeginPerfQueryINTEL(self.handle) };
    }

    /// Calls `glEndPerfQueryINTEL`.
    #[inline]
    pub fn end(&self) {
        let ctxt = self.context.make_current();
        unsafe { ctxt.gl.EndPerfQueryINTEL(self.handle) };
    }

    /// Reads the result into a buffer of `size` bytes, returning the buffer and the number of
    /// bytes the driver says it wrote. `bytes_written` starts at `0xd0d0d0d0` so that a driver
    /// not touching it can be told apart.
    pub fn data(&self, flags: gl::types::GLenum, size: usize) -> (Vec<u8>, u32) {
        let mut data = vec![0u8; size];
        let bytes_written = self.data_into(flags, &mut data);
        (data, bytes_written)
    }

    /// Same as `data`, into an existing buffer whose content is left alone by a driver that
    /// has nothing to write.
    pub fn data_into(&self, flags: gl::types::GLenum, data: &mut [u8]) -> u32 {
        let mut bytes_written: gl::types::GLuint = 0xd0d0_d0d0;

        let ctxt = self.context.make_current();
        unsafe {
            ctxt.gl.GetPerfQueryDataINTEL(self.handle, flags, data.len() as gl::types::GLsizei,
                                          data.as_mut_ptr() as *mut c_void, &mut bytes_written);
        }

        bytes_written
    }
}

#[cfg(test)]
mod tests {
    use rand::seq::SliceRandom;
    use rand::Rng;

    use super::*;

    #[test]
    fn data_types() {
        assert_eq!(value_size(gl::PERFQUERY_COUNTER_DATA_UINT32_INTEL), 4);
        assert_eq!(value_size(gl::PERFQUERY_COUNTER_DATA_FLOAT_INTEL), 4);
        assert_eq!(value_size(gl::PERFQUERY_COUNTER_DATA_BOOL32_INTEL), 4);
        assert_eq!(value_size(gl::PERFQUERY_COUNTER_DATA_UINT64_INTEL), 8);
        assert_eq!(value_size(gl::PERFQUERY_COUNTER_DATA_DOUBLE_INTEL), 8);
        assert_eq!(value_size(gl::PERFQUERY_COUNTER_EVENT_INTEL), 0);
        assert_eq!(value_size(0), 0);
    }

    #[test]
    fn counter_types() {
        assert_eq!(CounterType::from_glenum(gl::PERFQUERY_COUNTER_RAW_INTEL),
                   Some(CounterType::Raw));
        assert_eq!(CounterType::from_glenum(gl::PERFQUERY_COUNTER_TIMESTAMP_INTEL),
                   Some(CounterType::Timestamp));
        assert_eq!(CounterType::from_glenum(gl::PERFQUERY_COUNTER_DATA_UINT32_INTEL), None);
    }

    #[test]
    fn caps_mask() {
        assert!(is_valid_caps_mask(gl::PERFQUERY_SINGLE_CONTEXT_INTEL));
        assert!(is_valid_caps_mask(gl::PERFQUERY_GLOBAL_CONTEXT_INTEL));
        assert!(!is_valid_caps_mask(2));
        assert!(!is_valid_caps_mask(0xffff_ffff));
    }

    #[test]
    fn invalid_id_of_small_ids() {
        assert_eq!(find_invalid_id(&[]), u32::MAX);
        assert_eq!(find_invalid_id(&[1, 2, 3]), u32::MAX);
        assert_eq!(find_invalid_id(&[u32::MAX, u32::MAX - 1, 1]), u32::MAX - 2);
    }

    #[test]
    fn invalid_id_is_never_in_the_list() {
        let mut rng = rand::thread_rng();

        for _ in 0 .. 32 {
            // a dense block at the top of the range, shuffled
            let len = rng.gen_range(0 .. 64);
            let mut ids = (0 .. len).map(|i| u32::MAX - i).collect::<Vec<_>>();
            ids.push(rng.gen_range(1 .. 1000));
            ids.shuffle(&mut rng);

            let invalid = find_invalid_id(&ids);
            assert!(!ids.contains(&invalid));
            assert_eq!(invalid, u32::MAX - len);
        }
    }

    #[test]
    fn strings_stop_at_the_terminator() {
        assert_eq!(string_from_buffer(b"Pipeline Statistics\0garbage"), "Pipeline Statistics");
        assert_eq!(string_from_buffer(b"\0``"), "");
        assert_eq!(string_from_buffer(b"no terminator"), "no terminator");
    }

    #[test]
    fn formatted_values() {
        let bytes = 42u64.to_ne_bytes();
        assert_eq!(CounterDataType::Uint64.format_value(&bytes).as_deref(), Some("42"));
        assert_eq!(CounterDataType::Uint32.format_value(&7u32.to_ne_bytes()).as_deref(),
                   Some("7"));
        assert_eq!(CounterDataType::Double.format_value(&1.5f64.to_ne_bytes()).as_deref(),
                   Some("1.500000"));
        assert_eq!(CounterDataType::Double.format_value(&[0; 4]), None);
    }
}
