#[macro_use]
mod support;

use glconform::perf_query::{self, PerfQuery};
use glconform::{gl, GlError};

#[test]
fn queries_and_counters_are_valid() {
    let context = context_or_return!();
    if !context.get_extensions().supports("GL_INTEL_performance_query") {
        return;
    }

    let queries = perf_query::query_ids(&context);
    let invalid = perf_query::find_invalid_id(&queries);
    assert!(!queries.contains(&invalid));

    for &query in &queries {
        let info = perf_query::query_info(&context, query);
        assert!(perf_query::is_valid_caps_mask(info.caps_mask));
        assert_eq!(perf_query::counter_ids(&context, query).len() as u32, info.counters);

        for counter in perf_query::counter_ids(&context, query) {
            let counter = perf_query::counter_info(&context, query, counter);
            assert!(counter.data_type().is_some(), "{}", counter.name);
            assert!(counter.counter_type().is_some(), "{}", counter.name);
            assert!(counter.offset + counter.data_size <= info.data_size);
        }
    }

    context.assert_no_error(None);
}

#[test]
fn query_object_without_begin_has_no_data() {
    let context = context_or_return!();
    if !context.get_extensions().supports("GL_INTEL_performance_query") {
        return;
    }

    let query = match perf_query::query_ids(&context).first() {
        Some(&query) => query,
        None => return,
    };

    let perf = PerfQuery::create(&context, query).unwrap();
    let mut data = [b'`'; 64];
    let written = perf.data_into(gl::PERFQUERY_DONOT_FLUSH_INTEL, &mut data);

    assert_eq!(written, 0);
    assert!(data.iter().all(|&b| b == b'`'));
    assert!(context.check_error(GlError::NoError));
}

#[test]
fn creating_from_an_invalid_query_fails() {
    let context = context_or_return!();
    if !context.get_extensions().supports("GL_INTEL_performance_query") {
        return;
    }

    let invalid = perf_query::find_invalid_id(&perf_query::query_ids(&context));
    match PerfQuery::create(&context, invalid) {
        Err(GlError::InvalidValue) => (),
        Err(err) => panic!("unexpected error {}", err),
        Ok(_) => panic!("a query object was created for query {}", invalid),
    }
}
