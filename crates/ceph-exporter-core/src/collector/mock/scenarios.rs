//! Pre-built mock clusters.
//!
//! The JSON mirrors what `ceph -f json df` / `ceph -f json osd df` print on a
//! Quincy cluster, trimmed to a handful of OSDs.

use super::runner::MockCeph;
use crate::collector::collector::{CLUSTER_USAGE_ARGS, DEVICE_USAGE_ARGS};

const HEALTHY_DF: &str = r#"
{"stats":{"total_bytes":4398046511104,"total_avail_bytes":4260607557632,"total_used_bytes":131941395456,"total_used_raw_bytes":137438953472,"total_used_raw_ratio":0.03125,"num_osds":3,"num_per_pool_osds":3,"num_per_pool_omap_osds":3},
 "stats_by_class":{
   "hdd":{"total_bytes":3298534883328,"total_avail_bytes":3195455668224,"total_used_bytes":98956046336,"total_used_raw_bytes":103079215104,"total_used_raw_ratio":0.03125},
   "ssd":{"total_bytes":1099511627776,"total_avail_bytes":1065151889408,"total_used_bytes":32985349120,"total_used_raw_bytes":34359738368,"total_used_raw_ratio":0.03125}},
 "pools":[{"name":".mgr","id":1,"stats":{"stored":1114112,"objects":2,"kb_used":3264,"bytes_used":3342336,"percent_used":0,"max_avail":1348619747328}}]}
"#;

const HEALTHY_OSD_DF: &str = r#"
{"nodes":[
  {"id":0,"device_class":"hdd","name":"osd.0","type":"osd","type_id":0,"crush_weight":1.5,"depth":2,"pool_weights":{},"reweight":1,"kb":1610612736,"kb_used":50331648,"kb_used_data":48234496,"kb_used_omap":2048,"kb_used_meta":2095104,"kb_avail":1560281088,"utilization":3.125,"var":1,"pgs":33,"status":"up"},
  {"id":1,"device_class":"hdd","name":"osd.1","type":"osd","type_id":0,"crush_weight":1.5,"depth":2,"pool_weights":{},"reweight":1,"kb":1610612736,"kb_used":50331648,"kb_used_data":48234496,"kb_used_omap":2048,"kb_used_meta":2095104,"kb_avail":1560281088,"utilization":3.125,"var":1,"pgs":32,"status":"up"},
  {"id":2,"device_class":"ssd","name":"osd.2","type":"osd","type_id":0,"crush_weight":1,"depth":2,"pool_weights":{},"reweight":1,"kb":1073741824,"kb_used":33554432,"kb_used_data":32505856,"kb_used_omap":1024,"kb_used_meta":1047552,"kb_avail":1040187392,"utilization":3.125,"var":1,"pgs":1,"status":"up"}],
 "stray":[],
 "summary":{"total_kb":4294967296,"total_kb_used":134217728,"total_kb_used_data":128974848,"total_kb_used_omap":5120,"total_kb_used_meta":5237760,"total_kb_avail":4160749568,"average_utilization":3.125,"min_var":1,"max_var":1,"dev":0}}
"#;

const MIXED_STATUS_OSD_DF: &str = r#"
{"nodes":[
  {"id":0,"device_class":"hdd","name":"osd.0","kb":1073741824,"kb_used":33554432,"kb_used_data":32505856,"kb_used_omap":1024,"kb_used_meta":1047552,"pgs":64,"status":"up"},
  {"id":1,"device_class":"hdd","name":"osd.1","kb":0,"kb_used":0,"kb_used_data":0,"kb_used_omap":0,"kb_used_meta":0,"pgs":0,"status":"down"},
  {"id":2,"device_class":"ssd","name":"osd.2","kb":0,"kb_used":0,"kb_used_data":0,"kb_used_omap":0,"kb_used_meta":0,"pgs":0,"status":"destroyed"},
  {"id":3,"device_class":"ssd","name":"osd.3","kb":0,"pgs":0}],
 "stray":[],"summary":{}}
"#;

const EMPTY_DF: &str = r#"{"stats":{"total_bytes":0,"total_avail_bytes":0,"total_used_bytes":0,"total_used_raw_bytes":0,"total_used_raw_ratio":0,"num_osds":0,"num_per_pool_osds":0,"num_per_pool_omap_osds":0},"stats_by_class":{},"pools":[]}"#;

const EMPTY_OSD_DF: &str = r#"{"nodes":[],"stray":[],"summary":{"total_kb":0,"total_kb_used":0,"average_utilization":0}}"#;

impl MockCeph {
    /// Three OSDs, all up, across `hdd` and `ssd` classes.
    pub fn healthy_cluster() -> Self {
        let mut ceph = Self::new();
        ceph.add_output(CLUSTER_USAGE_ARGS, HEALTHY_DF);
        ceph.add_output(DEVICE_USAGE_ARGS, HEALTHY_OSD_DF);
        ceph
    }

    /// Four OSDs: one up, the others down, destroyed, or without status.
    pub fn mixed_status_cluster() -> Self {
        let mut ceph = Self::new();
        ceph.add_output(CLUSTER_USAGE_ARGS, HEALTHY_DF);
        ceph.add_output(DEVICE_USAGE_ARGS, MIXED_STATUS_OSD_DF);
        ceph
    }

    /// Freshly bootstrapped cluster without OSDs.
    pub fn empty_cluster() -> Self {
        let mut ceph = Self::new();
        ceph.add_output(CLUSTER_USAGE_ARGS, EMPTY_DF);
        ceph.add_output(DEVICE_USAGE_ARGS, EMPTY_OSD_DF);
        ceph
    }

    /// `df` works, `osd df` fails as when the mgr is unavailable.
    pub fn broken_device_source() -> Self {
        let mut ceph = Self::new();
        ceph.add_output(CLUSTER_USAGE_ARGS, HEALTHY_DF);
        ceph.add_failure(
            DEVICE_USAGE_ARGS,
            2,
            "Error ENOTSUP: Module 'osd_support' is not enabled",
        );
        ceph
    }
}
