/// One native-function call site: the table index it invokes and the byte
/// distance from the previous call site's opcode.
pub type CallSite = (u16, u32);

/// Walk flattened bytecode and collect every native-call site along with its
/// inter-call byte delta.
///
/// Opcodes outside the rules below fall through advancing only past
/// themselves; if an opcode's operand bytes are not available (truncated
/// bytecode), the walk stops and the calls collected so far are returned.
pub fn extract_calls(bytecode: &[u8]) -> Vec<CallSite> {
    let len = bytecode.len();
    let mut pc = 0usize;
    let mut last_pc = 0usize;
    let mut calls = Vec::new();

    while pc < len {
        let op = bytecode[pc];
        let advance = match op {
            37 => Some(1usize),
            38 => Some(2),
            39 => Some(3),
            40 | 41 => Some(4),
            44 => match (bytecode.get(pc + 2), bytecode.get(pc + 3)) {
                (Some(&hi), Some(&lo)) => {
                    let native_index = ((hi as u16) << 8) | lo as u16;
                    let delta = if last_pc > 0 { (pc - last_pc) as u32 } else { 0 };
                    calls.push((native_index, delta));
                    last_pc = pc;
                    Some(3)
                }
                _ => None,
            },
            45 => bytecode.get(pc + 4).map(|&n| n as usize + 4),
            46 => Some(2),
            52..=66 if op != 63 => Some(1),
            67..=92 => Some(2),
            93..=97 => Some(3),
            98 => bytecode.get(pc + 1).map(|&n| 1 + n as usize * 6),
            101..=104 => Some(1),
            _ => Some(0),
        };

        let Some(advance) = advance else { break };
        pc += advance + 1;
    }

    calls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bytecode_yields_no_calls() {
        assert_eq!(extract_calls(&[]), vec![]);
    }

    #[test]
    fn single_native_call_has_zero_delta() {
        // op 44, padding, native_index = 0x0102
        let bc = [44, 0, 1, 2];
        assert_eq!(extract_calls(&bc), vec![(0x0102, 0)]);
    }

    #[test]
    fn second_call_delta_is_pc_distance() {
        // first call at pc=0 (len 4), second call at pc=4
        let bc = [44, 0, 0, 1, 44, 0, 0, 2];
        let calls = extract_calls(&bc);
        assert_eq!(calls, vec![(0x0001, 0), (0x0002, 4)]);
    }

    #[test]
    fn non_call_opcodes_advance_pc_without_emitting() {
        // op 37 (+1, then +1 = total 2), then a native call
        let bc = [37, 0, 44, 0, 0, 9];
        let calls = extract_calls(&bc);
        assert_eq!(calls, vec![(0x0009, 0)]);
    }

    #[test]
    fn enter_opcode_uses_trailing_length_byte() {
        // op 45 at pc=0, bc[4] = 3 -> advance 3+4=7, then +1 = 8; pc=8 is end
        let mut bc = vec![45, 0, 0, 0, 3, 0, 0, 0];
        bc.push(44);
        bc.push(0);
        bc.push(0);
        bc.push(7);
        let calls = extract_calls(&bc);
        assert_eq!(calls, vec![(7, 0)]);
    }

    #[test]
    fn switch_opcode_uses_case_count() {
        // op 98, bc[1] = 2 cases -> advance = 1 + 2*6 = 13, then +1 = 14
        let mut bc = vec![0u8; 14];
        bc[0] = 98;
        bc[1] = 2;
        bc.extend_from_slice(&[44, 0, 0, 5]);
        let calls = extract_calls(&bc);
        assert_eq!(calls, vec![(5, 0)]);
    }

    #[test]
    fn truncated_native_operand_stops_cleanly() {
        // op 44 but only one operand byte follows
        let bc = [44, 0, 1];
        assert_eq!(extract_calls(&bc), vec![]);
    }

    #[test]
    fn opcode_63_is_excluded_from_the_52_66_rule() {
        // 63 falls through to the default +0 rule, so only the final +1 applies
        let bc = [63, 44, 0, 0, 1];
        let calls = extract_calls(&bc);
        assert_eq!(calls, vec![(1, 0)]);
    }
}
