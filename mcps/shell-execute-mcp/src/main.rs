//! Shell Execute MCP - runs shell commands with a timeout over stdio

use shell_execute_mcp::ShellExecuteServer;

mcp_common::serve_stdio!(ShellExecuteServer, "shell_execute_mcp");
