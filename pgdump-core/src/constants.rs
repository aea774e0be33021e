/// 备份文件命名相关常量
pub mod artifact {
    /// 备份文件名前缀
    pub const KEY_PREFIX: &str = "pgdump";

    /// 备份文件后缀
    pub const KEY_SUFFIX: &str = ".sql";

    /// 完整时间格式（实际存储的文件名和过期截止点）
    pub const DATETIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

    /// 按天备份的周期格式
    pub const DAILY_FORMAT: &str = "%Y-%m-%d";

    /// 按小时备份的周期格式
    pub const HOURLY_FORMAT: &str = "%Y-%m-%d_%H";

    /// 完整时间格式化后的固定长度（yyyy-MM-dd_HH-mm-ss）
    pub const DATETIME_LEN: usize = 19;
}

/// Docker 标签相关常量
pub mod labels {
    /// 默认标签命名空间，容器需带有该标签才会被备份
    pub const DEFAULT_NAMESPACE: &str = "pgdump";

    /// 数据库用户名标签后缀
    pub const USERNAME: &str = "username";

    /// 备份文件前缀标签后缀
    pub const PREFIX: &str = "prefix";

    /// 备份频率标签后缀
    pub const FREQUENCY: &str = "frequency";

    /// 保留天数标签后缀
    pub const DAYS_RETENTION: &str = "daysRetention";
}

/// 备份策略默认值
pub mod policy {
    /// 未设置 daysRetention 时的默认保留天数
    pub const DEFAULT_RETENTION_DAYS: u32 = 7;
}

/// 备份命令相关常量
pub mod dump {
    /// 在容器内执行的备份程序
    pub const PROGRAM: &str = "pg_dumpall";

    /// 生成包含清理语句的备份
    pub const CLEAN_FLAG: &str = "-c";

    /// 指定用户名参数
    pub const USER_FLAG: &str = "-U";
}

/// 配置相关常量
pub mod config {
    /// 默认配置文件名
    pub const CONFIG_FILE_NAME: &str = "pgdump.toml";

    /// 默认本地临时备份目录
    pub const DEFAULT_SCRATCH_DIR: &str = "/dumps";

    /// 默认执行间隔（分钟）
    pub const DEFAULT_INTERVAL_MINUTES: u64 = 15;

    /// 默认存储区域
    pub const DEFAULT_REGION: &str = "us-east-1";

    /// 环境变量覆盖项
    pub mod env {
        pub const DUMPS_PATH: &str = "DUMPS_PATH";
        pub const S3_API_KEY: &str = "S3_API_KEY";
        pub const S3_API_SECRET: &str = "S3_API_SECRET";
        pub const S3_API_ENDPOINT: &str = "S3_API_ENDPOINT";
        pub const S3_REGION: &str = "S3_REGION";
        pub const S3_BUCKET_NAME: &str = "S3_BUCKET_NAME";
    }
}

/// 超时相关常量
pub mod timeout {
    /// 单个 Docker 命令的默认超时时间（秒）
    pub const DEFAULT_COMMAND_TIMEOUT: u64 = 3600;

    /// 单次存储请求的默认超时时间（秒）
    pub const DEFAULT_REQUEST_TIMEOUT: u64 = 300;
}
