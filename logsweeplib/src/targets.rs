//! Cleanup targets and the built-in target list.
//!
//! A target pairs a path (or glob pattern) with the action to take on every
//! file it matches. Targets are grouped so a run can be restricted to, say,
//! only backups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What to do with a matched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Keep the file but empty it (live logs still held open by daemons)
    Truncate,
    /// Remove the file or directory
    Delete,
}

/// Family a target belongs to, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Group {
    SystemLogs,
    ArchivedLogs,
    PanelLogs,
    AppLogs,
    Backups,
}

impl Group {
    pub const ALL: [Group; 5] = [
        Group::SystemLogs,
        Group::ArchivedLogs,
        Group::PanelLogs,
        Group::AppLogs,
        Group::Backups,
    ];

    /// Name accepted on the command line and in target files.
    pub fn as_str(self) -> &'static str {
        match self {
            Group::SystemLogs => "system-logs",
            Group::ArchivedLogs => "archived-logs",
            Group::PanelLogs => "panel-logs",
            Group::AppLogs => "app-logs",
            Group::Backups => "backups",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Group {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "system-logs" | "system" => Ok(Group::SystemLogs),
            "archived-logs" | "archived" => Ok(Group::ArchivedLogs),
            "panel-logs" | "panel" => Ok(Group::PanelLogs),
            "app-logs" | "app" => Ok(Group::AppLogs),
            "backups" | "backup" => Ok(Group::Backups),
            _ => Err(format!("Unknown target group: {}", s)),
        }
    }
}

/// A single cleanup target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Target {
    /// Description shown in the label column
    pub label: String,
    /// Absolute path or glob pattern
    pub pattern: String,
    pub action: Action,
    pub group: Group,
}

impl Target {
    pub fn new(label: &str, pattern: &str, action: Action, group: Group) -> Self {
        Self {
            label: label.to_string(),
            pattern: pattern.to_string(),
            action,
            group,
        }
    }

    /// Whether the pattern needs glob expansion.
    pub fn is_glob(&self) -> bool {
        self.pattern.contains(['*', '?', '['])
    }
}

/// The built-in target list, ordered by group.
pub fn builtin_targets() -> Vec<Target> {
    use Action::{Delete, Truncate};
    use Group::*;

    vec![
        Target::new("授权日志", "/var/log/auth.log", Truncate, SystemLogs),
        Target::new("安全日志", "/var/log/secure", Truncate, SystemLogs),
        Target::new("系统日志", "/var/log/syslog", Truncate, SystemLogs),
        Target::new("系统消息", "/var/log/messages", Truncate, SystemLogs),
        Target::new("内核日志", "/var/log/kern.log", Truncate, SystemLogs),
        Target::new("守护进程日志", "/var/log/daemon.log", Truncate, SystemLogs),
        Target::new("计划任务日志", "/var/log/cron", Truncate, SystemLogs),
        Target::new("邮件日志", "/var/log/maillog", Truncate, SystemLogs),
        Target::new("登录失败记录", "/var/log/btmp", Truncate, SystemLogs),
        Target::new("登录记录", "/var/log/wtmp", Truncate, SystemLogs),
        Target::new("最近登录记录", "/var/log/lastlog", Truncate, SystemLogs),
        Target::new("压缩归档日志", "/var/log/*.gz", Delete, ArchivedLogs),
        Target::new("轮转日志", "/var/log/*.[0-9]", Delete, ArchivedLogs),
        Target::new("日期轮转日志", "/var/log/*-[0-9]*", Delete, ArchivedLogs),
        Target::new("Journal 归档", "/var/log/journal/*/*@*.journal", Delete, ArchivedLogs),
        Target::new("面板运行日志", "/www/server/panel/logs/*.log", Truncate, PanelLogs),
        Target::new("面板请求日志", "/www/server/panel/logs/request/*", Delete, PanelLogs),
        Target::new("面板操作日志库", "/www/server/panel/data/db/log.db", Delete, PanelLogs),
        Target::new("面板任务日志", "/tmp/panelExec.log", Truncate, PanelLogs),
        Target::new("网站访问日志", "/www/wwwlogs/*.log", Truncate, AppLogs),
        Target::new("Nginx 错误日志", "/www/server/nginx/logs/error.log", Truncate, AppLogs),
        Target::new("Nginx 访问日志", "/www/server/nginx/logs/access.log", Truncate, AppLogs),
        Target::new("Apache 日志", "/www/server/apache/logs/*_log", Truncate, AppLogs),
        Target::new("MySQL 慢查询日志", "/www/server/data/mysql-slow.log", Truncate, AppLogs),
        Target::new("MySQL 二进制日志", "/www/server/data/mysql-bin.[0-9]*", Delete, AppLogs),
        Target::new("PHP 慢日志", "/www/server/php/*/var/log/slow.log", Truncate, AppLogs),
        Target::new("Redis 日志", "/www/server/redis/redis.log", Truncate, AppLogs),
        Target::new("面板备份", "/www/backup/panel/*", Delete, Backups),
        Target::new("网站备份", "/www/backup/site/*", Delete, Backups),
        Target::new("数据库备份", "/www/backup/database/*", Delete, Backups),
        Target::new("文件历史副本", "/www/backup/file_history/*", Delete, Backups),
    ]
}
