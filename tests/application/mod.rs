mod dispatch_pipeline_test;
